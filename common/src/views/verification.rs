use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::views::Certificate;

/// Outcome of looking up a verification identifier.
///
/// Every lookup produces one of these, including lookups for identifiers that
/// are malformed or that could not be checked because storage was down.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct VerificationResult {
    /// The identifier exactly as it was submitted.
    pub verification_id: String,

    pub is_valid: bool,

    pub status: VerificationStatus,

    /// The full certificate record, present only when `is_valid` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_data: Option<Certificate>,

    /// Human-readable explanation of the outcome.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// The certificate exists and is authentic.
    Valid,

    /// No certificate was ever issued under this identifier. This answer is
    /// permanent.
    NotFound,

    /// The identifier is not in the form this system issues.
    Malformed,

    /// Storage could not be reached. The caller should try again later.
    Unavailable,
}

impl VerificationStatus {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Valid => "Certificate is valid and verified",
            Self::NotFound => "Certificate not found or invalid",
            Self::Malformed => "Verification ID is malformed; certificate not found or invalid",
            Self::Unavailable => {
                "Verification is temporarily unavailable. Please try again later."
            }
        }
    }

    /// Whether a later retry could produce a different answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl VerificationResult {
    pub fn valid(verification_id: impl Into<String>, certificate: Certificate) -> Self {
        Self {
            verification_id: verification_id.into(),
            is_valid: true,
            status: VerificationStatus::Valid,
            certificate_data: Some(certificate),
            message: VerificationStatus::Valid.message().into(),
        }
    }

    pub fn invalid(verification_id: impl Into<String>, status: VerificationStatus) -> Self {
        Self {
            verification_id: verification_id.into(),
            is_valid: false,
            status,
            certificate_data: None,
            message: status.message().into(),
        }
    }
}
