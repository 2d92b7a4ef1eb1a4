use std::sync::Arc;

use chrono::{NaiveDate, SubsecRound, Utc};
use thiserror::Error;
use tracing::{info, warn};
use vouch_common::{
    RoleCatalog, Signer,
    params::CreateCertificateParams,
    views::{Certificate, FieldIssue, InternshipMode},
};
use vouch_db::{
    models::{CertificateKey, DbCertificate},
    storage::{Storage, StoreError},
};

use crate::services::identifier::{IdGenerationError, IdGenerator};

/// How many fresh identifiers to try when the store reports the drawn one as
/// taken.
const MAX_ID_ATTEMPTS: usize = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The request was rejected before anything was stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Certificate request is invalid ({} problem(s))", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    IdGeneration(#[from] IdGenerationError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// A request that passed validation, with every field in its final form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub intern_name: String,
    pub role: String,
    pub duration: String,
    pub mode: InternshipMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: &str, reason: impl Into<String>) {
        self.0.push(FieldIssue {
            field: field.into(),
            reason: reason.into(),
        });
    }

    fn required_text(&mut self, field: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, "must not be empty");
        }
        value.to_string()
    }

    fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, "is required");
            return None;
        }
        match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(field, format!("{value:?} is not a date in YYYY-MM-DD form"));
                None
            }
        }
    }
}

/// Check every field of `params`, reporting all problems at once.
pub fn validate(
    params: &CreateCertificateParams,
    roles: &RoleCatalog,
) -> Result<ValidatedRequest, ValidationError> {
    let mut issues = Issues::default();

    let intern_name = issues.required_text("intern_name", &params.intern_name);

    let role = issues.required_text("role", &params.role);
    if !role.is_empty() && !roles.contains(&role) {
        issues.push("role", format!("{role:?} is not an offered role"));
    }

    let duration = issues.required_text("duration", &params.duration);

    let mode = match params.mode.parse::<InternshipMode>() {
        Ok(mode) => Some(mode),
        Err(reason) => {
            issues.push("mode", reason);
            None
        }
    };

    let start_date = issues.date("start_date", &params.start_date);
    let end_date = issues.date("end_date", &params.end_date);
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            issues.push(
                "end_date",
                format!("end date {end} is before start date {start}"),
            );
        }
    }

    match (mode, start_date, end_date) {
        (Some(mode), Some(start_date), Some(end_date)) if issues.0.is_empty() => {
            Ok(ValidatedRequest {
                intern_name,
                role,
                duration,
                mode,
                start_date,
                end_date,
            })
        }
        _ => Err(ValidationError { issues: issues.0 }),
    }
}

#[derive(Debug)]
pub struct IssuanceService {
    store: Arc<dyn Storage>,
    ids: Arc<dyn IdGenerator>,
    roles: Arc<RoleCatalog>,
    signer: Signer,
}

impl IssuanceService {
    pub fn new(
        store: Arc<dyn Storage>,
        ids: Arc<dyn IdGenerator>,
        roles: Arc<RoleCatalog>,
        signer: Signer,
    ) -> Self {
        Self {
            store,
            ids,
            roles,
            signer,
        }
    }

    pub fn roles(&self) -> &RoleCatalog {
        &self.roles
    }

    /// Validate, mint an identifier and persist a new certificate.
    ///
    /// Nothing is written unless validation passes. Storage failures are
    /// returned as-is for the caller to retry.
    #[tracing::instrument(skip_all, fields(role = %params.role))]
    pub async fn issue(
        &self,
        params: CreateCertificateParams,
    ) -> Result<Certificate, IssuanceError> {
        let request = validate(&params, &self.roles)?;

        // BSON datetimes only keep milliseconds; truncate now so the returned
        // record matches what later lookups read back.
        let created_at = Utc::now().trunc_subsecs(3);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let verification_id = self.ids.generate()?;

            let cert = DbCertificate {
                id: CertificateKey::issued_at(created_at),
                verification_id,
                intern_name: request.intern_name.clone(),
                role: request.role.clone(),
                duration: request.duration.clone(),
                mode: request.mode,
                start_date: request.start_date,
                end_date: request.end_date,
                issued_by: self.signer.name.clone(),
                issued_by_title: self.signer.title.clone(),
                company: self.signer.company.clone(),
                created_at,
            };

            match self.store.create(cert).await {
                Ok(stored) => {
                    info!(
                        verification_id = %stored.verification_id,
                        id = %stored.id,
                        "Issued certificate"
                    );
                    return Ok(stored.into());
                }
                Err(StoreError::DuplicateVerificationId(taken)) if attempt < MAX_ID_ATTEMPTS => {
                    warn!(
                        verification_id = %taken,
                        attempt,
                        "Drew an issued verification id, drawing again"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Mutex};

    use rand::{Rng, SeedableRng, rngs::StdRng};
    use vouch_common::{VerificationId, params::PaginationParams};
    use vouch_db::storage::{CertificateFilter, CertificateStore, memory::MemoryStorage};

    use super::*;
    use crate::services::identifier::RandomIdGenerator;

    /// Deterministic stand-in for the OS entropy source.
    #[derive(Debug)]
    struct SeededIdGenerator(Mutex<StdRng>);

    impl SeededIdGenerator {
        fn new(seed: u64) -> Self {
            Self(Mutex::new(StdRng::seed_from_u64(seed)))
        }
    }

    impl IdGenerator for SeededIdGenerator {
        fn generate(&self) -> Result<VerificationId, IdGenerationError> {
            let bytes: [u8; 16] = self.0.lock().unwrap().random();
            Ok(uuid::Builder::from_random_bytes(bytes).into_uuid().into())
        }
    }

    /// Hands out a fixed sequence of identifiers, repeating the last one.
    #[derive(Debug)]
    struct ScriptedIdGenerator(Mutex<Vec<VerificationId>>);

    impl IdGenerator for ScriptedIdGenerator {
        fn generate(&self) -> Result<VerificationId, IdGenerationError> {
            let mut ids = self.0.lock().unwrap();
            if ids.len() > 1 {
                Ok(ids.remove(0))
            } else {
                Ok(ids[0])
            }
        }
    }

    fn vid(n: u128) -> VerificationId {
        uuid::Builder::from_random_bytes(n.to_be_bytes()).into_uuid().into()
    }

    fn asha() -> CreateCertificateParams {
        CreateCertificateParams {
            intern_name: "Asha Rao".into(),
            role: "Backend Intern".into(),
            duration: "12-week".into(),
            mode: "online".into(),
            start_date: "2024-01-08".into(),
            end_date: "2024-04-01".into(),
        }
    }

    fn service(store: Arc<MemoryStorage>, ids: Arc<dyn IdGenerator>) -> IssuanceService {
        IssuanceService::new(
            store,
            ids,
            Arc::new(RoleCatalog::default()),
            Signer::default(),
        )
    }

    fn fields(err: &ValidationError) -> Vec<&str> {
        err.issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[tokio::test]
    async fn issues_the_asha_rao_certificate() {
        let store = Arc::new(MemoryStorage::new());
        let svc = service(store.clone(), Arc::new(RandomIdGenerator));

        let cert = svc.issue(asha()).await.unwrap();

        assert_eq!(cert.intern_name, "Asha Rao");
        assert_eq!(cert.role, "Backend Intern");
        assert_eq!(cert.mode, InternshipMode::Online);
        assert_eq!(cert.start_date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(cert.end_date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(cert.issued_by, "A Siddarth Reddy");
        assert_eq!(cert.issued_by_title, "Chief Technology Officer");
        assert_eq!(cert.company, "DNOT Technologies");
        assert_eq!(cert.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(chrono::DateTime::<Utc>::from(cert.id.datetime()), cert.created_at);

        let stored = store
            .get_by_verification_id(cert.verification_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Certificate::from(stored), cert);
    }

    #[tokio::test]
    async fn reversed_dates_are_rejected_and_nothing_is_stored() {
        let store = Arc::new(MemoryStorage::new());
        let svc = service(store.clone(), Arc::new(RandomIdGenerator));

        let err = svc
            .issue(CreateCertificateParams {
                start_date: "2024-06-10".into(),
                end_date: "2024-01-01".into(),
                ..asha()
            })
            .await
            .unwrap_err();

        let IssuanceError::Validation(err) = err else {
            panic!("expected a validation error, got {err:?}");
        };
        assert_eq!(fields(&err), vec!["end_date"]);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn same_day_internship_is_accepted() {
        let store = Arc::new(MemoryStorage::new());
        let svc = service(store.clone(), Arc::new(RandomIdGenerator));

        let cert = svc
            .issue(CreateCertificateParams {
                start_date: "2024-01-08".into(),
                end_date: "2024-01-08".into(),
                ..asha()
            })
            .await
            .unwrap();
        assert_eq!(cert.start_date, cert.end_date);
    }

    #[test]
    fn every_problem_is_reported() {
        let err = validate(
            &CreateCertificateParams {
                intern_name: "   ".into(),
                role: "Astronaut".into(),
                duration: "".into(),
                mode: "hybrid".into(),
                start_date: "".into(),
                end_date: "04/01/2024".into(),
            },
            &RoleCatalog::default(),
        )
        .unwrap_err();

        assert_eq!(
            fields(&err),
            vec!["intern_name", "role", "duration", "mode", "start_date", "end_date"]
        );
    }

    #[test]
    fn fields_are_normalized() {
        let req = validate(
            &CreateCertificateParams {
                intern_name: "  Asha Rao ".into(),
                mode: "OFFLINE".into(),
                ..asha()
            },
            &RoleCatalog::default(),
        )
        .unwrap();
        assert_eq!(req.intern_name, "Asha Rao");
        assert_eq!(req.mode, InternshipMode::Offline);
    }

    #[test]
    fn roles_come_from_the_catalog() {
        let catalog = RoleCatalog::new(["Research Intern"]);
        assert!(validate(&asha(), &catalog).is_err());
        assert!(
            validate(
                &CreateCertificateParams {
                    role: "Research Intern".into(),
                    ..asha()
                },
                &catalog
            )
            .is_ok()
        );
    }

    #[tokio::test]
    async fn identical_requests_yield_distinct_certificates() {
        let store = Arc::new(MemoryStorage::new());
        let svc = service(store.clone(), Arc::new(RandomIdGenerator));

        let a = svc.issue(asha()).await.unwrap();
        let b = svc.issue(asha()).await.unwrap();
        assert_ne!(a.verification_id, b.verification_id);
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn hundred_thousand_issuances_never_collide() {
        let store = Arc::new(MemoryStorage::new());
        let svc = service(store.clone(), Arc::new(SeededIdGenerator::new(0x5eed)));

        let mut seen = HashSet::new();
        for i in 0..100_000 {
            let cert = svc
                .issue(CreateCertificateParams {
                    intern_name: format!("Intern {i}"),
                    ..asha()
                })
                .await
                .unwrap();
            assert!(seen.insert(cert.verification_id), "collision at issuance {i}");
        }
        assert_eq!(store.len(), 100_000);
    }

    #[tokio::test]
    async fn taken_identifier_is_redrawn() {
        let store = Arc::new(MemoryStorage::new());
        let ids = Arc::new(ScriptedIdGenerator(Mutex::new(vec![vid(1), vid(1), vid(2)])));
        let svc = service(store.clone(), ids);

        let first = svc.issue(asha()).await.unwrap();
        let second = svc.issue(asha()).await.unwrap();

        assert_eq!(first.verification_id, vid(1));
        assert_eq!(second.verification_id, vid(2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_repeated_collisions() {
        let store = Arc::new(MemoryStorage::new());
        let ids = Arc::new(ScriptedIdGenerator(Mutex::new(vec![vid(7)])));
        let svc = service(store.clone(), ids);

        svc.issue(asha()).await.unwrap();
        let err = svc.issue(asha()).await.unwrap_err();
        assert!(matches!(
            err,
            IssuanceError::Storage(StoreError::DuplicateVerificationId(_))
        ));

        let all = store
            .list(CertificateFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }
}
