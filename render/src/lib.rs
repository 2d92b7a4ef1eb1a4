//! Certificate artifacts: the verification QR code and the certificate image.
//!
//! The renderer is deliberately split in two. [`layout::compose`] turns a
//! certificate record into a display list with every position fixed, and
//! [`raster`] paints that list onto an 800x600 canvas. Both halves are pure,
//! so a certificate rendered at issuance and the same certificate rendered at
//! verification time come out identical as long as the record and the static
//! assets are unchanged.
//!
//! Static assets (logo, signature, typeface) come from an [`AssetSource`]. A
//! render loads all of them concurrently and paints nothing until every one
//! has arrived.

pub mod assets;
pub mod code;
pub mod error;
pub mod layout;
pub mod raster;
pub mod renderer;

pub use assets::{AssetKind, AssetSource, FsAssetSource, MemoryAssetSource};
pub use code::{CodeEncoder, EncodedCode};
pub use error::RenderError;
pub use layout::Layout;
pub use renderer::{RenderedCertificate, Renderer};
