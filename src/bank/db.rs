//! Database connection management and schema bootstrap

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Starting balance every sub-account is seeded and reset to.
pub fn starting_balance() -> rust_decimal::Decimal {
    rust_decimal::Decimal::new(500_00, 2)
}

/// PostgreSQL-wire connection pool (CockroachDB or plain Postgres).
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(32)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("database connection pool established");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the account table and seed the demo accounts (alice and
    /// bob, one asset and one expense row each) if they do not exist.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS account (
                   id BIGSERIAL PRIMARY KEY,
                   name TEXT NOT NULL,
                   account_type TEXT NOT NULL,
                   balance DECIMAL(19, 2) NOT NULL,
                   updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                   UNIQUE (name, account_type)
               )"#,
        )
        .execute(&self.pool)
        .await?;

        for name in ["alice", "bob"] {
            for account_type in ["asset", "expense"] {
                sqlx::query(
                    r#"INSERT INTO account (name, account_type, balance)
                       VALUES ($1, $2, $3)
                       ON CONFLICT (name, account_type) DO NOTHING"#,
                )
                .bind(name)
                .bind(account_type)
                .bind(starting_balance())
                .execute(&self.pool)
                .await?;
            }
        }

        tracing::info!("account schema ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_balance_is_500() {
        assert_eq!(starting_balance().to_string(), "500.00");
    }
}
