use std::path::PathBuf;

use clap::Parser;
use vouch_common::RoleCatalog;

#[derive(Clone, Parser)]
pub struct RolesParams {
    /// TOML role catalog to read instead of the built-in one.
    #[clap(long, env = "VOUCH_ROLES_FILE")]
    pub roles_file: Option<PathBuf>,
}

pub fn load_catalog(roles_file: Option<&PathBuf>) -> anyhow::Result<RoleCatalog> {
    match roles_file {
        Some(path) => RoleCatalog::from_file(path),
        None => Ok(RoleCatalog::default()),
    }
}

pub fn roles(RolesParams { roles_file }: RolesParams) -> anyhow::Result<()> {
    for role in load_catalog(roles_file.as_ref())?.iter() {
        println!("{role}");
    }
    Ok(())
}
