//! End-to-end stress scenario against a live database
//!
//! Serves the gateway on an ephemeral port, resets both demo accounts
//! to 500.00 and fires 200 concurrent withdrawals with random amounts
//! in [0, 50], alternating between alice and bob. Every response must
//! be a success or the negative-balance rejection (417), and neither
//! aggregate balance may end up below zero.

use std::sync::Arc;

use rust_decimal::Decimal;

use roachbank::bank::{ChaosDelay, Database};
use roachbank::gateway::{self, AppState};

const TEST_DATABASE_URL: &str = "postgresql://root@localhost:26257/roachbank?sslmode=disable";

async fn serve_gateway() -> String {
    let db = Database::connect(TEST_DATABASE_URL)
        .await
        .expect("Failed to connect");
    db.ensure_schema().await.expect("Failed to bootstrap schema");

    let state = Arc::new(AppState::new(
        Arc::new(db),
        // Widen the race window so transfers actually contend.
        ChaosDelay::new(25, 175),
        "roachbank-stress".to_string(),
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, gateway::router(state))
            .await
            .expect("gateway stopped");
    });

    format!("http://{}", addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore] // Requires CockroachDB/PostgreSQL
async fn stress_concurrent_withdrawals() {
    let base = serve_gateway().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/account/reset"))
        .send()
        .await
        .expect("reset request failed")
        .error_for_status()
        .expect("reset rejected");

    let mut tasks = Vec::new();
    for i in 0..200 {
        let client = client.clone();
        let base = base.clone();

        tasks.push(tokio::spawn(async move {
            let (name, account_type) = if i % 2 == 0 {
                ("alice", "expense")
            } else {
                ("bob", "asset")
            };
            let cents: i64 = {
                use rand::Rng;
                rand::thread_rng().gen_range(0..=50_00)
            };
            // Withdrawals only
            let amount = Decimal::new(-cents, 2);

            let body = serde_json::json!({
                "name": name,
                "accountType": account_type,
                "amount": amount.to_string(),
            });

            client
                .post(format!("{base}/account/transfer"))
                .json(&body)
                .send()
                .await
                .expect("transfer request failed")
                .status()
        }));
    }

    for task in tasks {
        let status = task.await.expect("transfer task panicked");
        assert!(
            status.is_success() || status == reqwest::StatusCode::EXPECTATION_FAILED,
            "unexpected status: {status}"
        );
    }

    for name in ["alice", "bob"] {
        let text = client
            .get(format!("{base}/account/{name}/balance"))
            .send()
            .await
            .expect("balance request failed")
            .error_for_status()
            .expect("balance rejected")
            .text()
            .await
            .expect("balance body unreadable");

        let balance: Decimal = text.trim().parse().expect("balance not a decimal");
        assert!(
            balance >= Decimal::ZERO,
            "negative balance for {name}: {balance}"
        );
    }
}
