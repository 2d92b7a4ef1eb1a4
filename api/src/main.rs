use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vouch_api::{config::VouchApiConfig, server};
use vouch_db::storage::{Storage, memory::MemoryStorage, mongodb::MongoDBStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = VouchApiConfig::parse();

    if config.dump_openapi {
        let (_, api) = server::make(config, Arc::new(MemoryStorage::new()))?;
        let json = api.to_pretty_json()?;
        print!("{}", json);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or("vouch_api=info,vouch_db=info,vouch_render=info".into()),
        )
        .pretty()
        .init();

    let db: Arc<dyn Storage> = if config.in_memory {
        warn!("Using in-memory storage, certificates will not survive a restart");
        Arc::new(MemoryStorage::new())
    } else {
        let db = MongoDBStorage::new(&config.mongodb_uri)
            .await
            .context("Failed to connect to MongoDB")?;
        db.migrate().await.context("Failed to prepare MongoDB indexes")?;
        Arc::new(db)
    };

    let bind_addr = config.bind_addr;
    let (router, _) = server::make(config, db)?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    info!("Listening on http://{:?}", bind_addr);

    axum::serve(listener, router)
        .await
        .context("Server exited with an error")?;

    Ok(())
}
