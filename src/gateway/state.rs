use std::sync::Arc;

use crate::bank::{ChaosDelay, Database};
use crate::txn::{HintRegistry, OperationProfile, TransactionHints};

/// Operation identities the hint registry is keyed on.
pub mod ops {
    pub const LIST: &str = "account.list";
    pub const GET: &str = "account.get";
    pub const BALANCE: &str = "account.balance";
    pub const TRANSFER: &str = "account.transfer";
    pub const RESET: &str = "account.reset";
}

/// Shared gateway state
pub struct AppState {
    pub db: Arc<Database>,
    /// Per-operation retry budgets and session hints, bound at startup.
    pub hints: HintRegistry,
    /// Race-widening delay hook for contention demos.
    pub chaos: ChaosDelay,
    /// Session tag issued as `SET application_name`.
    pub application_name: String,
}

impl AppState {
    pub fn new(db: Arc<Database>, chaos: ChaosDelay, application_name: String) -> Self {
        Self {
            db,
            hints: default_profiles(),
            chaos,
            application_name,
        }
    }
}

/// Profiles matching the declared operations: listing reads from
/// followers, point reads are read-only, writes use the plain profile.
fn default_profiles() -> HintRegistry {
    let mut registry = HintRegistry::new();
    registry.register(
        ops::LIST,
        OperationProfile::with_hints(TransactionHints::follower_read()),
    );
    registry.register(
        ops::GET,
        OperationProfile::with_hints(TransactionHints::read_only()),
    );
    registry.register(
        ops::BALANCE,
        OperationProfile::with_hints(TransactionHints::read_only()),
    );
    registry.register(ops::TRANSFER, OperationProfile::default());
    registry.register(ops::RESET, OperationProfile::default());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_profiles() {
        let registry = default_profiles();

        assert!(registry.lookup(ops::LIST).hints.follower_read);
        assert!(registry.lookup(ops::GET).hints.read_only);
        assert!(registry.lookup(ops::BALANCE).hints.read_only);
        assert!(!registry.lookup(ops::TRANSFER).hints.read_only);
        assert_eq!(registry.lookup(ops::TRANSFER).boundary.retry_attempts, 3);
    }
}
