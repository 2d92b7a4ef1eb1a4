use std::{collections::HashMap, fmt, path::PathBuf};

use async_trait::async_trait;
use tracing::debug;

/// The static inputs a certificate render depends on besides the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Organization logo, drawn top-left. Required.
    Logo,

    /// Image of the signer's signature, drawn bottom-left. Required.
    Signature,

    /// TrueType/OpenType font used for all text. Required.
    Typeface,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Logo => "logo",
            Self::Signature => "signature",
            Self::Typeface => "typeface",
        })
    }
}

/// Somewhere static assets can be fetched from.
///
/// `Ok(None)` means the asset is not configured at all, which is distinct
/// from a configured asset that failed to load.
#[async_trait]
pub trait AssetSource: fmt::Debug + Send + Sync {
    async fn load(&self, kind: AssetKind) -> std::io::Result<Option<Vec<u8>>>;
}

/// Assets read from the local filesystem on every render.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    pub logo: PathBuf,
    pub signature: PathBuf,
    pub typeface: PathBuf,
}

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn load(&self, kind: AssetKind) -> std::io::Result<Option<Vec<u8>>> {
        let path = match kind {
            AssetKind::Logo => &self.logo,
            AssetKind::Signature => &self.signature,
            AssetKind::Typeface => &self.typeface,
        };

        debug!(%kind, path = %path.display(), "Reading asset");
        tokio::fs::read(path).await.map(Some)
    }
}

/// Assets held in memory, e.g. embedded in a binary or built by a test.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<AssetKind, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: AssetKind, bytes: impl Into<Vec<u8>>) -> Self {
        self.assets.insert(kind, bytes.into());
        self
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn load(&self, kind: AssetKind) -> std::io::Result<Option<Vec<u8>>> {
        Ok(self.assets.get(&kind).cloned())
    }
}
