use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Roles offered when no catalog file is configured.
pub const DEFAULT_ROLES: &[&str] = &[
    "Frontend Intern",
    "Backend Intern",
    "Marketing Strategist",
    "Full Stack Developer Intern",
    "UI/UX Designer Intern",
    "Data Analyst Intern",
    "DevOps Intern",
    "Content Writer Intern",
];

/// Ordered set of role titles a certificate may be issued for.
///
/// The order is preserved so that clients can present the catalog as-is.
/// Duplicate entries are dropped on construction, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCatalog {
    roles: Vec<String>,
}

impl RoleCatalog {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for role in roles {
            let role = role.into().trim().to_string();
            if role.is_empty() || deduped.contains(&role) {
                continue;
            }
            deduped.push(role);
        }
        Self { roles: deduped }
    }

    /// Load a catalog from a TOML file of the form `roles = ["...", ...]`.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read role catalog {}: {}", path.display(), e)
        })?;
        let catalog: RoleCatalog = toml::from_str(&raw).map_err(|e| {
            anyhow::anyhow!("Failed to parse role catalog {}: {}", path.display(), e)
        })?;
        let catalog = Self::new(catalog.roles);

        if catalog.is_empty() {
            anyhow::bail!("Role catalog {} does not list any roles", path.display());
        }

        info!(path = %path.display(), roles = catalog.len(), "Loaded role catalog");
        Ok(catalog)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_ROLES.iter().copied())
    }
}
