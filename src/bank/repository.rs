//! Repository layer for account rows
//!
//! All queries run on an open transaction handle so the session hints
//! applied to that transaction govern them.

use super::models::{Account, AccountType};
use rust_decimal::Decimal;
use sqlx::{Postgres, Row, Transaction, postgres::PgRow};

pub struct AccountRepository;

impl AccountRepository {
    /// List sub-account rows, name-ascending, paged.
    pub async fn list(
        tx: &mut Transaction<'_, Postgres>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Account>, sqlx::Error> {
        let rows = sqlx::query(
            r#"SELECT id, name, account_type, balance, updated_at
               FROM account
               ORDER BY name, account_type
               OFFSET $1 LIMIT $2"#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&mut **tx)
        .await?;

        rows.into_iter().map(map_account).collect()
    }

    /// Get one sub-account row by ID
    pub async fn get_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Option<Account>, sqlx::Error> {
        let row = sqlx::query(
            r#"SELECT id, name, account_type, balance, updated_at
               FROM account WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(map_account).transpose()
    }

    /// Aggregate balance for an account name, summed across all of its
    /// sub-account rows. `None` when the name has no rows.
    pub async fn get_balance(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        let row = sqlx::query(r#"SELECT SUM(balance) AS balance FROM account WHERE name = $1"#)
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.get::<Option<Decimal>, _>("balance"))
    }

    /// Apply a signed delta to one named sub-account. Returns the
    /// number of rows touched (zero when the row does not exist).
    pub async fn update_balance(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        account_type: AccountType,
        delta: Decimal,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE account
               SET balance = balance + $3, updated_at = now()
               WHERE name = $1 AND account_type = $2"#,
        )
        .bind(name)
        .bind(account_type.as_str())
        .bind(delta)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    /// Reset every sub-account balance to the given amount.
    pub async fn reset_balances(
        tx: &mut Transaction<'_, Postgres>,
        amount: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(r#"UPDATE account SET balance = $1, updated_at = now()"#)
            .bind(amount)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

fn map_account(row: PgRow) -> Result<Account, sqlx::Error> {
    let type_str: String = row.get("account_type");
    let account_type: AccountType = type_str
        .parse()
        .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

    Ok(Account {
        id: row.get("id"),
        name: row.get("name"),
        account_type,
        balance: row.get("balance"),
        updated_at: row.get("updated_at"),
    })
}
