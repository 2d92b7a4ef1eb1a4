use std::{fmt, time::SystemTime};

use bson::{Binary, Bson, spec::BinarySubtype};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::Ulid;
use vouch_common::{
    VerificationId,
    views::{Certificate, InternshipMode},
};

/// Primary key of a stored certificate.
///
/// A ULID whose timestamp half is the certificate's issuance time, so keys
/// sort in issuance order. Stored as 16 raw bytes under `_id`; the text form
/// is only used in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CertificateKey(Ulid);

impl CertificateKey {
    /// A fresh key stamped with the current time.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// A fresh key stamped with `created_at`.
    pub fn issued_at(created_at: DateTime<Utc>) -> Self {
        Self(Ulid::from_datetime(SystemTime::from(created_at)))
    }

    /// Parse the text form used in `/api/certificates/{id}`.
    pub fn parse(s: &str) -> Option<Self> {
        Ulid::from_string(s).ok().map(Self)
    }

    fn to_binary(self) -> Binary {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes: self.0.to_bytes().to_vec(),
        }
    }
}

impl Default for CertificateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CertificateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Ulid> for CertificateKey {
    fn from(value: Ulid) -> Self {
        Self(value)
    }
}

impl From<CertificateKey> for Ulid {
    fn from(value: CertificateKey) -> Self {
        value.0
    }
}

impl From<CertificateKey> for Bson {
    fn from(value: CertificateKey) -> Self {
        Bson::Binary(value.to_binary())
    }
}

impl Serialize for CertificateKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_binary().serialize(s)
    }
}

impl<'de> Deserialize<'de> for CertificateKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let bin = Binary::deserialize(d)?;
        let len = bin.bytes.len();
        let bytes: [u8; 16] = bin.bytes.try_into().map_err(|_| {
            serde::de::Error::custom(format!("certificate _id must be 16 bytes, got {len}"))
        })?;
        Ok(Self(Ulid::from_bytes(bytes)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbCertificate {
    #[serde(rename = "_id")]
    pub id: CertificateKey,

    /// Public verification identifier, unique across the collection
    pub verification_id: VerificationId,

    pub intern_name: String,
    pub role: String,

    /// Free-form duration, e.g. "12-week"
    pub duration: String,

    pub mode: InternshipMode,

    /// Stored as `YYYY-MM-DD` text
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub issued_by: String,
    pub issued_by_title: String,
    pub company: String,

    /// When the certificate was issued. Millisecond precision, since that is
    /// all a BSON datetime keeps.
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<DbCertificate> for Certificate {
    fn from(value: DbCertificate) -> Self {
        Self {
            id: value.id.into(),
            verification_id: value.verification_id,
            intern_name: value.intern_name,
            role: value.role,
            duration: value.duration,
            mode: value.mode,
            start_date: value.start_date,
            end_date: value.end_date,
            issued_by: value.issued_by,
            issued_by_title: value.issued_by_title,
            company: value.company,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn sample() -> DbCertificate {
        DbCertificate {
            id: CertificateKey::issued_at(Utc.with_ymd_and_hms(2024, 4, 2, 9, 30, 0).unwrap()),
            verification_id: VerificationId::from_uuid(Uuid::new_v4()),
            intern_name: "Asha Rao".into(),
            role: "Backend Intern".into(),
            duration: "12-week".into(),
            mode: InternshipMode::Online,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            issued_by: "A Siddarth Reddy".into(),
            issued_by_title: "Chief Technology Officer".into(),
            company: "DNOT Technologies".into(),
            created_at: Utc.with_ymd_and_hms(2024, 4, 2, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn document_layout() {
        let cert = sample();
        let doc = bson::to_document(&cert).unwrap();

        assert!(doc.get_binary_generic("_id").is_ok());
        assert_eq!(
            doc.get_str("verification_id").unwrap(),
            cert.verification_id.to_string()
        );
        assert_eq!(doc.get_str("mode").unwrap(), "online");
        assert_eq!(doc.get_str("start_date").unwrap(), "2024-01-08");
        assert!(doc.get_datetime("created_at").is_ok());
    }

    #[test]
    fn survives_a_bson_round_trip() {
        let cert = sample();
        let doc = bson::to_document(&cert).unwrap();
        let back: DbCertificate = bson::from_document(doc).unwrap();
        assert_eq!(back, cert);
    }

    #[test]
    fn key_is_stored_as_raw_bytes() {
        let key = CertificateKey::new();
        let bson = bson::to_bson(&key).unwrap();
        assert!(matches!(bson, Bson::Binary(ref b) if b.bytes.len() == 16));

        let back: CertificateKey = bson::from_bson(bson).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn truncated_key_is_rejected() {
        let bson = Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: vec![1, 2, 3],
        });
        assert!(bson::from_bson::<CertificateKey>(bson).is_err());
    }

    #[test]
    fn key_carries_the_issuance_time() {
        let created_at = Utc.with_ymd_and_hms(2024, 4, 2, 9, 30, 0).unwrap();
        let key = CertificateKey::issued_at(created_at);
        assert_eq!(DateTime::<Utc>::from(Ulid::from(key).datetime()), created_at);

        let later = CertificateKey::issued_at(created_at + chrono::Duration::milliseconds(1));
        assert!(later > key);
    }

    #[test]
    fn key_text_form_parses_back() {
        let key = CertificateKey::new();
        assert_eq!(CertificateKey::parse(&key.to_string()), Some(key));
        assert_eq!(CertificateKey::parse("definitely not a key"), None);
    }

    #[test]
    fn converts_to_view() {
        let cert = sample();
        let view: Certificate = cert.clone().into();
        assert_eq!(view.id, Ulid::from(cert.id));
        assert_eq!(view.verification_id, cert.verification_id);
        assert_eq!(view.intern_name, "Asha Rao");
    }
}
