use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;
use vouch_common::{VerificationId, params::PaginationParams};

use crate::models::{CertificateKey, DbCertificate};

pub mod memory;
pub mod mongodb;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query Error: {0}")]
    MongoDB(#[from] ::mongodb::error::Error),

    /// The identifier is already held by a stored certificate.
    #[error("Verification id {0} has already been issued")]
    DuplicateVerificationId(VerificationId),

    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait Storage: CertificateStore + Debug + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct CertificateFilter {
    pub id: Option<Vec<CertificateKey>>,
    pub verification_id: Option<Vec<VerificationId>>,
    pub role: Option<String>,
}

impl CertificateFilter {
    pub fn matches(&self, cert: &DbCertificate) -> bool {
        if let Some(ids) = &self.id {
            if !ids.contains(&cert.id) {
                return false;
            }
        }
        if let Some(vids) = &self.verification_id {
            if !vids.contains(&cert.verification_id) {
                return false;
            }
        }
        if let Some(role) = &self.role {
            if &cert.role != role {
                return false;
            }
        }
        true
    }
}

/// Append-only certificate persistence.
///
/// There is deliberately no update or delete: a certificate is immutable once
/// issued and its verification id is never handed out again.
#[async_trait]
pub trait CertificateStore {
    /// Insert a new certificate. Fails with
    /// [`StoreError::DuplicateVerificationId`] without writing anything if the
    /// verification id is already taken.
    async fn create(&self, cert: DbCertificate) -> Result<DbCertificate, StoreError>;

    /// List certificates in issuance order.
    async fn list(
        &self,
        filter: CertificateFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<DbCertificate>, StoreError>;

    async fn get(&self, id: CertificateKey) -> Result<Option<DbCertificate>, StoreError> {
        let certs = CertificateStore::list(
            self,
            CertificateFilter {
                id: Some(vec![id]),
                ..Default::default()
            },
            PaginationParams {
                next_token: None,
                limit: Some(1),
            },
        )
        .await?;

        Ok(certs.into_iter().next())
    }

    async fn get_by_verification_id(
        &self,
        verification_id: VerificationId,
    ) -> Result<Option<DbCertificate>, StoreError> {
        let certs = CertificateStore::list(
            self,
            CertificateFilter {
                verification_id: Some(vec![verification_id]),
                ..Default::default()
            },
            PaginationParams {
                next_token: None,
                limit: Some(1),
            },
        )
        .await?;

        Ok(certs.into_iter().next())
    }
}
