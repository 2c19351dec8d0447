//! `stockroom`: prints the current stock report from local storage.

use std::sync::Arc;

use anyhow::Context;
use stockroom_app::config::ENV_LOG_FORMAT;
use stockroom_app::{AppConfig, Tracker, render};
use stockroom_infra::SqliteStorage;
use stockroom_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_format = std::env::var(ENV_LOG_FORMAT)
        .map(|raw| LogFormat::parse(&raw))
        .unwrap_or_default();
    stockroom_observability::tracing::init(log_format);

    let config = AppConfig::from_env()?;

    tracing::info!(db = %config.db_path.display(), "opening stock storage");
    let storage = SqliteStorage::open(&config.db_path)
        .await
        .context("failed to open stock storage")?;

    let tracker = Tracker::mount(Arc::new(storage), config.persistence.clone()).await;
    print!("{}", render::render_report(&tracker));

    tracker.shutdown().await;
    Ok(())
}
