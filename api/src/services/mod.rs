//! The certificate protocol: minting identifiers, issuing certificates and
//! verifying them. Handlers and the CLI are thin wrappers around these.

pub mod identifier;
pub mod issuance;
pub mod verification;

pub use identifier::{IdGenerationError, IdGenerator, RandomIdGenerator};
pub use issuance::{IssuanceError, IssuanceService, ValidationError};
pub use verification::VerificationService;
