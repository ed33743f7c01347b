//! Explicit transaction-context flag
//!
//! The retry coordinator must run outside any transaction and the hint
//! applier strictly inside one. Instead of ambient thread-local state,
//! both assertions consume this flag, threaded explicitly through the
//! call chain.

/// Marks whether a database transaction is active in the calling context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxnContext {
    transaction_active: bool,
}

impl TxnContext {
    /// Context outside any transaction (the only valid entry point for
    /// a retry-guarded operation).
    pub fn new() -> Self {
        Self {
            transaction_active: false,
        }
    }

    /// Context inside an open transaction, constructed by the unit of
    /// work right after `begin()`.
    pub fn in_transaction() -> Self {
        Self {
            transaction_active: true,
        }
    }

    pub fn is_transaction_active(&self) -> bool {
        self.transaction_active
    }
}
