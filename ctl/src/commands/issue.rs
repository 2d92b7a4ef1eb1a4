use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use vouch_api::services::{IssuanceError, IssuanceService, RandomIdGenerator};
use vouch_common::{
    Signer,
    params::CreateCertificateParams,
    signer::{DEFAULT_COMPANY, DEFAULT_SIGNER_NAME, DEFAULT_SIGNER_TITLE},
    views::Certificate,
};
use vouch_db::storage::Storage;

use super::roles::load_catalog;

#[derive(Clone, Parser)]
pub struct IssueParams {
    #[clap(short, long)]
    pub name: String,

    #[clap(short, long)]
    pub role: String,

    /// Free-form, e.g. "12-week".
    #[clap(short, long)]
    pub duration: String,

    /// `online` or `offline`.
    #[clap(short, long)]
    pub mode: String,

    /// YYYY-MM-DD
    #[clap(long)]
    pub start_date: String,

    /// YYYY-MM-DD
    #[clap(long)]
    pub end_date: String,

    #[clap(long, env = "VOUCH_ROLES_FILE")]
    pub roles_file: Option<PathBuf>,

    #[clap(long, env = "VOUCH_SIGNER_NAME", default_value = DEFAULT_SIGNER_NAME)]
    pub signer_name: String,

    #[clap(long, env = "VOUCH_SIGNER_TITLE", default_value = DEFAULT_SIGNER_TITLE)]
    pub signer_title: String,

    #[clap(long, env = "VOUCH_COMPANY", default_value = DEFAULT_COMPANY)]
    pub company: String,
}

pub async fn issue(stg: Arc<dyn Storage>, params: IssueParams) -> anyhow::Result<()> {
    let cert = issue_certificate(stg, params).await?;
    println!("{}", serde_json::to_string_pretty(&cert)?);
    Ok(())
}

async fn issue_certificate(
    stg: Arc<dyn Storage>,
    IssueParams {
        name,
        role,
        duration,
        mode,
        start_date,
        end_date,
        roles_file,
        signer_name,
        signer_title,
        company,
    }: IssueParams,
) -> anyhow::Result<Certificate> {
    let service = IssuanceService::new(
        stg,
        Arc::new(RandomIdGenerator),
        Arc::new(load_catalog(roles_file.as_ref())?),
        Signer {
            name: signer_name,
            title: signer_title,
            company,
        },
    );

    let result = service
        .issue(CreateCertificateParams {
            intern_name: name,
            role,
            duration,
            mode,
            start_date,
            end_date,
        })
        .await;

    match result {
        Ok(cert) => Ok(cert),
        Err(IssuanceError::Validation(err)) => {
            for problem in &err.issues {
                eprintln!("  {}: {}", problem.field, problem.reason);
            }
            Err(err.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use vouch_db::storage::memory::MemoryStorage;

    use super::*;

    fn params() -> IssueParams {
        IssueParams {
            name: "Asha Rao".into(),
            role: "Backend Intern".into(),
            duration: "12-week".into(),
            mode: "online".into(),
            start_date: "2024-01-08".into(),
            end_date: "2024-04-01".into(),
            roles_file: None,
            signer_name: "Priya Menon".into(),
            signer_title: "Head of Engineering".into(),
            company: "Example Labs".into(),
        }
    }

    #[tokio::test]
    async fn issues_with_the_given_signer() {
        let stg = Arc::new(MemoryStorage::new());
        let cert = issue_certificate(stg.clone(), params()).await.unwrap();

        assert_eq!(cert.issued_by, "Priya Menon");
        assert_eq!(cert.issued_by_title, "Head of Engineering");
        assert_eq!(cert.company, "Example Labs");
        assert_eq!(stg.len(), 1);
    }

    #[tokio::test]
    async fn invalid_requests_are_rejected() {
        let stg = Arc::new(MemoryStorage::new());
        let err = issue_certificate(
            stg.clone(),
            IssueParams {
                mode: "hybrid".into(),
                ..params()
            },
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("invalid"));
        assert!(stg.is_empty());
    }
}
