use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vouch_db::storage::{Storage, mongodb::MongoDBStorage};

use crate::commands::{IssueParams, RenderParams, RolesParams, VerifyParams};

mod commands;

#[derive(Parser)]
pub struct Args {
    #[clap(subcommand)]
    command: Command,

    #[clap(
        short = 'D',
        long,
        env = "VOUCH_API_MONGODB_URI",
        default_value = "mongodb://localhost:27017/certificate_db"
    )]
    db_url: String,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Issue a certificate and print it as JSON.
    Issue(IssueParams),

    /// Look up a verification id and print the outcome as JSON.
    Verify(VerifyParams),

    /// Render a stored certificate to a PNG file.
    Render(RenderParams),

    /// Print the role catalog, one role per line.
    Roles(RolesParams),
}

async fn connect(db_url: &str) -> anyhow::Result<Arc<dyn Storage>> {
    let stg = MongoDBStorage::new(db_url)
        .await
        .context("Failed to connect to MongoDB")?;

    // Issuing relies on the unique index to reject reused verification ids.
    stg.migrate()
        .await
        .context("Failed to prepare MongoDB indexes")?;

    Ok(Arc::new(stg))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or("vouch_db=warn,vouch_render=warn,vouch_api=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Issue(params) => commands::issue(connect(&args.db_url).await?, params).await,
        Command::Verify(params) => commands::verify(connect(&args.db_url).await?, params).await,
        Command::Render(params) => commands::render(connect(&args.db_url).await?, params).await,
        Command::Roles(params) => commands::roles(params),
    }
}
