use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// The public identifier printed on a certificate and encoded in its QR code.
///
/// Backed by a version 4 UUID. It is always serialized in its hyphenated text
/// form, including in BSON, so that stored documents can be matched against
/// the identifier exactly as it appears in a verification URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerificationId(Uuid);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed verification id: {0:?}")]
pub struct MalformedVerificationId(pub String);

impl VerificationId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an identifier received from an untrusted caller.
    ///
    /// Only the canonical lowercase hyphenated form is accepted, so that a
    /// lookup is always an exact match on what was issued.
    pub fn parse(s: &str) -> Result<Self, MalformedVerificationId> {
        let uuid = Uuid::try_parse(s).map_err(|_| MalformedVerificationId(s.to_string()))?;
        let id = Self(uuid);
        if id.to_string() != s {
            return Err(MalformedVerificationId(s.to_string()));
        }
        Ok(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for VerificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for VerificationId {
    type Err = MalformedVerificationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for VerificationId {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

impl Serialize for VerificationId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VerificationId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
