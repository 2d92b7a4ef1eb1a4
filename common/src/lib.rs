//! Types shared between the Vouch API, its storage layer, the renderer and the
//! operator CLI.
//!
//! [`params`] holds request bodies accepted by the API, [`views`] holds the
//! shapes it returns. The remaining modules carry the small pieces of domain
//! vocabulary every crate needs: the verification identifier, the role
//! catalog and the organizational signer.

pub mod params;
pub mod roles;
pub mod signer;
pub mod verification_id;
pub mod views;

pub use roles::RoleCatalog;
pub use signer::Signer;
pub use verification_id::VerificationId;
