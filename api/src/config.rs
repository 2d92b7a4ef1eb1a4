use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};
use vouch_common::{
    RoleCatalog, Signer,
    signer::{DEFAULT_COMPANY, DEFAULT_SIGNER_NAME, DEFAULT_SIGNER_TITLE},
};

#[derive(Clone, Debug, Parser)]
pub struct VouchApiConfig {
    #[clap(
        short,
        long,
        env = "VOUCH_API_BIND_ADDR",
        default_value = "0.0.0.0:4000"
    )]
    pub bind_addr: SocketAddr,

    /// Origin of the web client. Cross-origin requests are only accepted from
    /// here.
    #[clap(
        long,
        env = "VOUCH_API_PUBLIC_URL",
        default_value = "http://localhost:3000"
    )]
    pub public_url: String,

    /// Base URL encoded into verification QR codes, which resolve to
    /// `{base}/verify/{verification_id}`. Defaults to `public_url`.
    #[clap(long, env = "VOUCH_VERIFICATION_BASE_URL")]
    pub verification_base_url: Option<String>,

    #[clap(long, default_value_t = false)]
    pub dump_openapi: bool,

    #[clap(
        long,
        env = "VOUCH_API_MONGODB_URI",
        default_value = "mongodb://localhost:27017/certificate_db"
    )]
    pub mongodb_uri: String,

    /// Keep certificates in process memory instead of MongoDB. Everything is
    /// lost on shutdown; meant for local development only.
    #[clap(long, env = "VOUCH_API_IN_MEMORY", default_value_t = false)]
    pub in_memory: bool,

    /// TOML file listing the roles certificates can be issued for, as
    /// `roles = ["Backend Intern", ...]`. The built-in catalog is used when
    /// unset.
    #[clap(long, env = "VOUCH_ROLES_FILE")]
    pub roles_file: Option<PathBuf>,

    #[clap(long, env = "VOUCH_SIGNER_NAME", default_value = DEFAULT_SIGNER_NAME)]
    pub signer_name: String,

    #[clap(long, env = "VOUCH_SIGNER_TITLE", default_value = DEFAULT_SIGNER_TITLE)]
    pub signer_title: String,

    #[clap(long, env = "VOUCH_COMPANY", default_value = DEFAULT_COMPANY)]
    pub company: String,
}

impl VouchApiConfig {
    pub fn verification_base_url(&self) -> &str {
        self.verification_base_url
            .as_deref()
            .unwrap_or(&self.public_url)
    }

    /// Load the role catalog from `roles_file`, or fall back to the built-in
    /// one.
    ///
    /// # Errors
    ///
    /// Returns an error if `roles_file` is set but can't be read, doesn't parse
    /// or lists no roles.
    pub fn role_catalog(&self) -> anyhow::Result<RoleCatalog> {
        match &self.roles_file {
            Some(path) => RoleCatalog::from_file(path),
            None => Ok(RoleCatalog::default()),
        }
    }

    pub fn signer(&self) -> Signer {
        Signer {
            name: self.signer_name.clone(),
            title: self.signer_title.clone(),
            company: self.company.clone(),
        }
    }
}
