//! In-memory storage backend using DashMap.
//!
//! Used by tests and for running the API without a database. Contents are
//! lost when the process exits.

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use vouch_common::{VerificationId, params::PaginationParams};

use crate::{
    models::DbCertificate,
    storage::{CertificateFilter, CertificateStore, Storage, StoreError},
};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    certificates: DashMap<VerificationId, DbCertificate>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl CertificateStore for MemoryStorage {
    async fn create(&self, cert: DbCertificate) -> Result<DbCertificate, StoreError> {
        match self.certificates.entry(cert.verification_id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateVerificationId(cert.verification_id)),
            Entry::Vacant(slot) => {
                slot.insert(cert.clone());
                Ok(cert)
            }
        }
    }

    async fn list(
        &self,
        filter: CertificateFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<DbCertificate>, StoreError> {
        let mut certs: Vec<DbCertificate> = self
            .certificates
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        certs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(certs
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }
}
