//! roachbank - Concurrent money transfers on CockroachDB
//!
//! Demonstrates safe concurrent transfers against a distributed SQL
//! database whose optimistic concurrency control aborts transactions
//! under contention. The core is the transaction retry and session-hint
//! coordination layer.
//!
//! # Modules
//!
//! - [`txn`] - Retry coordinator, transient-failure classifier and
//!   session hint applier
//! - [`bank`] - Accounts, the funds-transfer unit of work and the
//!   negative-balance rule
//! - [`gateway`] - HTTP surface (axum)
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing setup

pub mod bank;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod txn;

// Convenient re-exports at crate root
pub use bank::{Account, AccountType, BankError, BankService, ChaosDelay, Database};
pub use txn::{
    HintRegistry, OperationProfile, Priority, RetryError, SessionSetting, SettingValue,
    TransactionBoundary, TransactionHints, Transient, TxnContext,
};
