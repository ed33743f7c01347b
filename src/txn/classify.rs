//! Transient failure classification
//!
//! Decides whether an error raised by a unit of work is worth retrying.
//! Transient means the database aborted the transaction because of
//! concurrent contention: serialization conflicts (SQLSTATE 40001, the
//! code CockroachDB uses for all client-retryable aborts) and deadlock
//! losers (40P01). Everything else is fatal and must propagate
//! unmodified.
//!
//! Classification is pure: the same error value always classifies the
//! same way.

/// SQLSTATE: serialization failure, raised by optimistic concurrency
/// control when a conflicting transaction wins.
pub const SERIALIZATION_FAILURE: &str = "40001";

/// SQLSTATE: this transaction was picked as the deadlock loser.
pub const DEADLOCK_DETECTED: &str = "40P01";

/// Whether a SQLSTATE code marks a contention abort that is expected to
/// succeed on retry.
pub fn sqlstate_is_transient(code: &str) -> bool {
    matches!(code, SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
}

/// Predicate the retry coordinator consults for each failure.
///
/// Wrapper errors delegate to their inner cause (one level), so a
/// serialization failure stays retryable through a domain-error
/// envelope while the envelope itself propagates unchanged when the
/// cause is not transient.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for sqlx::Error {
    fn is_transient(&self) -> bool {
        match self {
            sqlx::Error::Database(db) => db
                .code()
                .map(|code| sqlstate_is_transient(&code))
                .unwrap_or(false),
            _ => false,
        }
    }
}
