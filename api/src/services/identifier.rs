use std::fmt::Debug;

use thiserror::Error;
use vouch_common::VerificationId;

/// The operating system could not supply randomness. Identifiers are never
/// minted from a weaker source instead.
#[derive(Debug, Error)]
#[error("Entropy source unavailable: {0}")]
pub struct IdGenerationError(getrandom::Error);

pub trait IdGenerator: Debug + Send + Sync {
    fn generate(&self) -> Result<VerificationId, IdGenerationError>;
}

/// Mints version 4 UUIDs (122 random bits) straight from the OS entropy
/// source. Identifiers carry nothing about the certificate they name.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> Result<VerificationId, IdGenerationError> {
        let mut bytes = [0u8; 16];
        getrandom::fill(&mut bytes).map_err(IdGenerationError)?;
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid().into())
    }
}
