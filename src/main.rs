//! roachbank - Concurrent money transfers on CockroachDB
//!
//! Entry point: config -> logging -> database pool -> schema bootstrap
//! -> HTTP gateway.

use std::sync::Arc;

use anyhow::Context;

use roachbank::bank::{ChaosDelay, Database};
use roachbank::config::AppConfig;
use roachbank::gateway::{self, AppState};

/// Get environment name from command line (--env/-e argument)
fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = roachbank::logging::init_logging(&config);

    tracing::info!("starting roachbank in {} mode", env);

    let db = Database::connect(&config.postgres_url)
        .await
        .context("failed to connect to database")?;
    db.ensure_schema()
        .await
        .context("failed to bootstrap account schema")?;

    let chaos = if config.chaos.enabled {
        tracing::warn!(
            min_ms = config.chaos.min_ms,
            max_ms = config.chaos.max_ms,
            "chaos delay enabled, transfers will pause to widen race windows"
        );
        ChaosDelay::new(config.chaos.min_ms, config.chaos.max_ms)
    } else {
        ChaosDelay::disabled()
    };

    let state = Arc::new(AppState::new(
        Arc::new(db),
        chaos,
        config.application_name.clone(),
    ));

    gateway::run_server(&config.gateway.host, config.gateway.port, state).await
}
