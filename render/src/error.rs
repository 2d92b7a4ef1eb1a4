use thiserror::Error;

use crate::assets::AssetKind;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No {0} asset is configured")]
    MissingAsset(AssetKind),

    #[error("Failed to load {kind} asset: {source}")]
    AssetLoad {
        kind: AssetKind,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {kind} asset: {source}")]
    AssetDecode {
        kind: AssetKind,
        #[source]
        source: image::ImageError,
    },

    #[error("Unusable {kind} asset: {reason}")]
    InvalidAsset { kind: AssetKind, reason: String },

    #[error("Typeface is not a valid TrueType/OpenType font")]
    Typeface(#[from] ab_glyph::InvalidFont),

    #[error("Failed to encode verification code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("Failed to export image: {0}")]
    Export(#[source] image::ImageError),
}
