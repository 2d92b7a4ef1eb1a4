use serde::{Deserialize, Serialize};

pub const DEFAULT_SIGNER_NAME: &str = "A Siddarth Reddy";
pub const DEFAULT_SIGNER_TITLE: &str = "Chief Technology Officer";
pub const DEFAULT_COMPANY: &str = "DNOT Technologies";

/// The organizational identity stamped onto every issued certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub name: String,
    pub title: String,
    pub company: String,
}

impl Default for Signer {
    fn default() -> Self {
        Self {
            name: DEFAULT_SIGNER_NAME.into(),
            title: DEFAULT_SIGNER_TITLE.into(),
            company: DEFAULT_COMPANY.into(),
        }
    }
}
