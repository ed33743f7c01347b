//! Transaction retry and session-hint coordination
//!
//! Two composable wrappers around a transaction-opening unit of work,
//! applied in a fixed relative order:
//!
//! - [`retry`] runs outside any transaction and re-invokes the unit of
//!   work on transient contention failures with exponential backoff.
//! - [`session`] runs inside each attempt's transaction and issues the
//!   configured session hints before the business logic.
//!
//! [`classify`] decides which failures are worth retrying, [`hints`]
//! holds the per-operation configuration and [`context`] carries the
//! explicit transaction-active flag both assertion points consume.

pub mod classify;
pub mod context;
pub mod hints;
pub mod retry;
pub mod session;

pub use classify::{Transient, sqlstate_is_transient};
pub use context::TxnContext;
pub use hints::{
    HintRegistry, OperationProfile, Priority, SessionSetting, SettingValue, TransactionBoundary,
    TransactionHints,
};
pub use retry::RetryError;
pub use session::{HintError, SessionStatement};
