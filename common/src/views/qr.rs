use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A freshly generated verification QR code.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QrCodeResponse {
    /// PNG image of the code as a `data:image/png;base64,...` URL.
    pub qr_code: String,

    /// The URL encoded in the QR code.
    pub verification_url: String,
}
