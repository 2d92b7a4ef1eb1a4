use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for issuing a certificate.
///
/// Every field is accepted as text and checked by the issuance service, so
/// that a missing or malformed field is reported alongside all other problems
/// with the request instead of as a body parsing failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateCertificateParams {
    /// Full name of the intern, as it should appear on the certificate.
    pub intern_name: String,

    /// Role title. Must be one of the roles in the configured catalog.
    pub role: String,

    /// Free-form duration, e.g. "12-week".
    pub duration: String,

    /// Either `online` or `offline`.
    pub mode: String,

    /// First day of the internship, formatted `YYYY-MM-DD`.
    pub start_date: String,

    /// Last day of the internship, formatted `YYYY-MM-DD`.
    pub end_date: String,
}
