//! # TaskNest Reminder Worker
//!
//! Background process that scans for tasks whose reminder time is coming
//! up and delivers each reminder exactly once.
//!
//! ## Architecture
//!
//! The worker:
//! - Polls the shared SQLite database on a fixed cadence
//! - Selects open tasks with an unemitted reminder inside the lookahead window
//! - Delivers each reminder through the configured notifier
//! - Stamps delivered tasks so a reminder never fires twice
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasknest-worker
//! ```

use std::sync::Arc;
use tasknest_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig, DEFAULT_DATABASE_URL},
};
use tasknest_worker::{
    notifier::ConsoleNotifier,
    poller::{PollerConfig, ReminderPoller},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasknest_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskNest Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let pool = create_pool(DatabaseConfig {
        url: database_url,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let config = PollerConfig::from_env()?;
    let shutdown = CancellationToken::new();

    let poller = ReminderPoller::new(
        pool,
        Arc::new(ConsoleNotifier),
        config,
        shutdown.clone(),
    );
    let handle = tokio::spawn(poller.run());

    tracing::info!("Worker ready, polling for due reminders");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping poller...");
    shutdown.cancel();
    handle.await?;

    tracing::info!("Worker stopped");
    Ok(())
}
