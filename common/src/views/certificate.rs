use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

use crate::VerificationId;

/// An issued internship completion certificate.
///
/// Certificates are immutable: once issued, every field keeps the value it
/// was stored with, which is what lets a certificate be re-rendered years later
/// and come out identical.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Certificate {
    /// Internal record identifier.
    pub id: Ulid,

    /// Public identifier used to verify the certificate.
    #[schema(value_type = String, format = Uuid)]
    pub verification_id: VerificationId,

    pub intern_name: String,
    pub role: String,
    pub duration: String,
    pub mode: InternshipMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Name of the person who signed the certificate.
    pub issued_by: String,

    /// Title of the person who signed the certificate.
    pub issued_by_title: String,

    /// Issuing organization.
    pub company: String,

    pub created_at: DateTime<Utc>,
}

/// How the internship was attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InternshipMode {
    Online,
    Offline,
}

impl InternshipMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for InternshipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InternshipMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(format!("expected \"online\" or \"offline\", got {other:?}")),
        }
    }
}
