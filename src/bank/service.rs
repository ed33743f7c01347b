//! Transaction-opening units of work for the account endpoints
//!
//! Each operation here is what the retry coordinator re-invokes: it
//! begins a transaction, applies the session hints for the operation,
//! runs the business logic and commits. Dropping the `sqlx` transaction
//! on any error path rolls it back, so the handle is released on every
//! exit.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::time::Duration;

use super::db::starting_balance;
use super::error::BankError;
use super::models::{Account, AccountType};
use super::repository::AccountRepository;
use crate::txn::context::TxnContext;
use crate::txn::hints::TransactionHints;
use crate::txn::session;

/// Randomized pause injected before the balance read and before the
/// balance write, solely to widen the race window between concurrent
/// transfers so contention bugs become observable. Disabled by default.
#[derive(Debug, Clone)]
pub struct ChaosDelay {
    enabled: bool,
    min_ms: u64,
    max_ms: u64,
}

impl ChaosDelay {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_ms: 0,
            max_ms: 0,
        }
    }

    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            enabled: true,
            min_ms,
            max_ms: max_ms.max(min_ms),
        }
    }

    pub async fn pause(&self) {
        if !self.enabled {
            return;
        }
        let ms = {
            use rand::Rng;
            rand::thread_rng().gen_range(self.min_ms..=self.max_ms)
        };
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

pub struct BankService;

impl BankService {
    /// Funds transfer: read the aggregate balance for `name`, reject
    /// when the delta would drive it negative, otherwise apply the
    /// delta to the named sub-account atomically.
    pub async fn transfer(
        pool: &PgPool,
        app_name: &str,
        hints: &TransactionHints,
        chaos: &ChaosDelay,
        name: &str,
        account_type: AccountType,
        amount: Decimal,
    ) -> Result<(), BankError> {
        let mut tx = pool.begin().await.map_err(BankError::Database)?;
        session::apply(TxnContext::in_transaction(), &mut tx, app_name, hints).await?;

        chaos.pause().await;
        let balance = AccountRepository::get_balance(&mut tx, name)
            .await?
            .ok_or_else(|| BankError::UnknownAccount(name.to_string()))?;

        if balance + amount < Decimal::ZERO {
            return Err(BankError::NegativeBalance {
                name: name.to_string(),
                amount,
            });
        }

        chaos.pause().await;
        let touched = AccountRepository::update_balance(&mut tx, name, account_type, amount).await?;
        if touched == 0 {
            return Err(BankError::UnknownAccount(name.to_string()));
        }

        tx.commit().await.map_err(BankError::Database)?;
        Ok(())
    }

    pub async fn list_accounts(
        pool: &PgPool,
        app_name: &str,
        hints: &TransactionHints,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Account>, BankError> {
        let mut tx = pool.begin().await.map_err(BankError::Database)?;
        session::apply(TxnContext::in_transaction(), &mut tx, app_name, hints).await?;

        let accounts = AccountRepository::list(&mut tx, offset, limit).await?;
        tx.commit().await.map_err(BankError::Database)?;
        Ok(accounts)
    }

    pub async fn get_account(
        pool: &PgPool,
        app_name: &str,
        hints: &TransactionHints,
        id: i64,
    ) -> Result<Account, BankError> {
        let mut tx = pool.begin().await.map_err(BankError::Database)?;
        session::apply(TxnContext::in_transaction(), &mut tx, app_name, hints).await?;

        let account = AccountRepository::get_by_id(&mut tx, id)
            .await?
            .ok_or(BankError::AccountNotFound(id))?;
        tx.commit().await.map_err(BankError::Database)?;
        Ok(account)
    }

    /// Aggregate balance for an account name.
    pub async fn get_balance(
        pool: &PgPool,
        app_name: &str,
        hints: &TransactionHints,
        name: &str,
    ) -> Result<Decimal, BankError> {
        let mut tx = pool.begin().await.map_err(BankError::Database)?;
        session::apply(TxnContext::in_transaction(), &mut tx, app_name, hints).await?;

        let balance = AccountRepository::get_balance(&mut tx, name)
            .await?
            .ok_or_else(|| BankError::UnknownAccount(name.to_string()))?;
        tx.commit().await.map_err(BankError::Database)?;
        Ok(balance)
    }

    /// Reset every sub-account to the fixed starting balance.
    pub async fn reset(
        pool: &PgPool,
        app_name: &str,
        hints: &TransactionHints,
    ) -> Result<(), BankError> {
        let mut tx = pool.begin().await.map_err(BankError::Database)?;
        session::apply(TxnContext::in_transaction(), &mut tx, app_name, hints).await?;

        AccountRepository::reset_balances(&mut tx, starting_balance()).await?;
        tx.commit().await.map_err(BankError::Database)?;
        Ok(())
    }
}
