use std::sync::Arc;

use vouch_db::storage::Storage;
use vouch_render::CodeEncoder;

use crate::{
    config::VouchApiConfig,
    services::{IssuanceService, RandomIdGenerator, VerificationService},
};

#[derive(Debug, Clone)]
pub struct ApiContext {
    pub config: Arc<VouchApiConfig>,
    pub db: Arc<dyn Storage>,
    pub issuance: Arc<IssuanceService>,
    pub verification: Arc<VerificationService>,
    pub encoder: Arc<CodeEncoder>,
}

impl ApiContext {
    /// Wire the services up against `db`.
    ///
    /// # Errors
    ///
    /// Fails if the configured role catalog can't be loaded.
    pub fn new(config: VouchApiConfig, db: Arc<dyn Storage>) -> anyhow::Result<Self> {
        let roles = Arc::new(config.role_catalog()?);

        let issuance = IssuanceService::new(
            db.clone(),
            Arc::new(RandomIdGenerator),
            roles,
            config.signer(),
        );
        let verification = VerificationService::new(db.clone());
        let encoder = CodeEncoder::new(config.verification_base_url());

        Ok(Self {
            config: Arc::new(config),
            db,
            issuance: Arc::new(issuance),
            verification: Arc::new(verification),
            encoder: Arc::new(encoder),
        })
    }
}
