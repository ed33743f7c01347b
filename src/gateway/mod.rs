//! HTTP gateway: router and server bootstrap

pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

pub use state::AppState;

/// Build the account router. Split from [`run_server`] so tests can
/// serve it on an ephemeral port.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/account", get(handlers::list_accounts))
        .route("/account/transfer", post(handlers::transfer))
        .route("/account/reset", post(handlers::reset))
        .route("/account/{id}", get(handlers::get_account))
        .route("/account/{id}/balance", get(handlers::get_balance))
        .with_state(state)
}

/// Start the HTTP gateway and serve until the process exits.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
