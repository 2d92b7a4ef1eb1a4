use std::sync::Arc;

use tracing::{error, info};
use vouch_common::{
    VerificationId,
    views::{VerificationResult, VerificationStatus},
};
use vouch_db::storage::Storage;

/// Answers "is this certificate genuine?" for anyone holding a verification
/// id.
#[derive(Debug, Clone)]
pub struct VerificationService {
    store: Arc<dyn Storage>,
}

impl VerificationService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Look up `raw`. Never fails: malformed input, unknown ids and storage
    /// outages are all reported through [`VerificationStatus`].
    #[tracing::instrument(skip(self))]
    pub async fn verify(&self, raw: &str) -> VerificationResult {
        let Ok(verification_id) = VerificationId::parse(raw) else {
            info!("Rejected malformed verification id");
            return VerificationResult::invalid(raw, VerificationStatus::Malformed);
        };

        match self.store.get_by_verification_id(verification_id).await {
            Ok(Some(cert)) => VerificationResult::valid(raw, cert.into()),
            Ok(None) => VerificationResult::invalid(raw, VerificationStatus::NotFound),
            Err(e) => {
                error!("Verification lookup failed: {e}");
                VerificationResult::invalid(raw, VerificationStatus::Unavailable)
            }
        }
    }
}
