use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::debug;
use vouch_common::VerificationId;

use crate::error::RenderError;

/// Pixel size of one QR module.
const MODULE_SIZE: u32 = 10;

/// A scannable code pointing at a certificate's verification page.
///
/// Codes are never stored. Encoding the same identifier again produces a code
/// for the same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCode {
    pub verification_id: VerificationId,

    /// The exact payload of the code.
    pub verification_url: String,

    /// PNG image of the code.
    pub png: Vec<u8>,
}

impl EncodedCode {
    /// The PNG as a `data:` URL, ready to drop into an `<img>` tag.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Turns verification identifiers into QR codes.
#[derive(Debug, Clone)]
pub struct CodeEncoder {
    base_url: String,
}

impl CodeEncoder {
    /// `base_url` is the public origin the verification page is served from,
    /// e.g. `https://certs.example.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// The canonical reference for a certificate. This, and never the bare
    /// identifier, is what goes into the code so that any scanner app can
    /// open it.
    pub fn verification_url(&self, verification_id: &VerificationId) -> String {
        format!("{}/verify/{}", self.base_url, verification_id)
    }

    pub fn encode(&self, verification_id: VerificationId) -> Result<EncodedCode, RenderError> {
        let verification_url = self.verification_url(&verification_id);

        let code = QrCode::with_error_correction_level(verification_url.as_bytes(), EcLevel::L)?;
        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(MODULE_SIZE, MODULE_SIZE)
            .quiet_zone(true)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(RenderError::Export)?;

        debug!(
            %verification_id,
            version = ?code.version(),
            bytes = png.len(),
            "Encoded verification code"
        );

        Ok(EncodedCode {
            verification_id,
            verification_url,
            png,
        })
    }
}
