//! Retry coordinator
//!
//! Wraps a transaction-opening unit of work and retries it on transient
//! contention failures with bounded exponential backoff. The coordinator
//! itself must run outside any transaction: each attempt opens and fully
//! closes its own transaction, and the backoff sleep holds no database
//! resource.
//!
//! Attempts within one invocation are strictly sequential; attempt N+1
//! cannot start before attempt N's transaction has closed. Retry state
//! lives on this call's stack and is never shared across invocations.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use super::classify::Transient;
use super::context::TxnContext;
use super::hints::TransactionBoundary;

/// Backoff before the second attempt.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(150);

/// Backoff ceiling.
pub const MAX_BACKOFF: Duration = Duration::from_millis(1000);

const BACKOFF_MULTIPLIER: f64 = 1.5;

/// Terminal outcome of a retry-guarded operation that did not succeed.
#[derive(Debug, Error)]
pub enum RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// The retry budget was exhausted by consecutive transient failures.
    #[error("too many transient failures ({attempts}) for operation '{operation}', giving up")]
    Exhausted {
        attempts: u32,
        operation: String,
        #[source]
        source: E,
    },

    /// A transaction was already active when entering the retry
    /// boundary. Programming error; never retried.
    #[error("transaction already active when entering retry boundary for '{0}'")]
    NestedTransaction(String),

    /// A non-transient failure from the unit of work, propagated
    /// unmodified after a single attempt.
    #[error(transparent)]
    Fatal(E),
}

/// Next backoff after a wait: multiply by 1.5, capped at [`MAX_BACKOFF`].
pub fn next_backoff(current: Duration) -> Duration {
    let grown = (current.as_millis() as f64 * BACKOFF_MULTIPLIER) as u64;
    Duration::from_millis(grown.min(MAX_BACKOFF.as_millis() as u64))
}

/// Run `unit` until it succeeds, a fatal error occurs, or the retry
/// budget is spent.
///
/// `unit` is a zero-argument operation that opens a transaction, runs
/// the business logic and commits or rolls back before returning. It is
/// re-invoked from outside any transaction after each transient failure.
///
/// Cancel-safe: dropping the returned future during a backoff sleep
/// abandons the loop without opening another transaction.
pub async fn execute<T, E, F, Fut>(
    ctx: TxnContext,
    operation: &str,
    boundary: TransactionBoundary,
    mut unit: F,
) -> Result<T, RetryError<E>>
where
    E: Transient + std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if ctx.is_transaction_active() {
        return Err(RetryError::NestedTransaction(operation.to_string()));
    }

    let mut attempts: u32 = 0;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        attempts += 1;
        match unit().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                if attempts >= boundary.retry_attempts {
                    tracing::warn!(
                        operation,
                        attempts,
                        max_attempts = boundary.retry_attempts,
                        error = %err,
                        "retry budget exhausted, giving up"
                    );
                    return Err(RetryError::Exhausted {
                        attempts,
                        operation: operation.to_string(),
                        source: err,
                    });
                }

                tracing::warn!(
                    operation,
                    attempt = attempts,
                    max_attempts = boundary.retry_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "transient failure, backing off before retry"
                );

                // The previous attempt's transaction is already closed;
                // this sleep holds nothing.
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff);
            }
            Err(err) => return Err(RetryError::Fatal(err)),
        }
    }
}
