use std::sync::Arc;

use clap::Parser;
use vouch_api::services::VerificationService;
use vouch_db::storage::Storage;

#[derive(Clone, Parser)]
pub struct VerifyParams {
    pub verification_id: String,
}

/// Prints the result and fails unless the certificate is valid, so scripts
/// can rely on the exit status.
pub async fn verify(stg: Arc<dyn Storage>, params: VerifyParams) -> anyhow::Result<()> {
    let result = VerificationService::new(stg)
        .verify(&params.verification_id)
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_valid {
        anyhow::bail!("{}", result.message);
    }
    Ok(())
}
