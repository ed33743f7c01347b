use rust_decimal::Decimal;
use thiserror::Error;

use crate::txn::classify::Transient;
use crate::txn::session::HintError;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Hint(#[from] HintError),

    /// Business-rule rejection: the transfer would drive the aggregate
    /// balance below zero. State is left unchanged.
    #[error("insufficient funds {amount} for account '{name}'")]
    NegativeBalance { name: String, amount: Decimal },

    #[error("unknown account name: {0}")]
    UnknownAccount(String),

    #[error("account {0} not found")]
    AccountNotFound(i64),
}

impl Transient for BankError {
    /// Delegates to the wrapped database error one level down; domain
    /// rejections are never transient.
    fn is_transient(&self) -> bool {
        match self {
            BankError::Database(e) => e.is_transient(),
            BankError::Hint(e) => e.is_transient(),
            BankError::NegativeBalance { .. }
            | BankError::UnknownAccount(_)
            | BankError::AccountNotFound(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::classify::testing::db_error;

    #[test]
    fn test_wrapped_serialization_failure_stays_transient() {
        let err = BankError::Database(db_error("40001"));
        assert!(err.is_transient());

        let err = BankError::Hint(HintError::Database(db_error("40P01")));
        assert!(err.is_transient());
    }

    #[test]
    fn test_wrapped_fatal_cause_stays_fatal() {
        let err = BankError::Database(sqlx::Error::RowNotFound);
        assert!(!err.is_transient());

        // The envelope keeps the original cause intact.
        assert!(matches!(
            err,
            BankError::Database(sqlx::Error::RowNotFound)
        ));
    }

    #[test]
    fn test_domain_rejections_never_transient() {
        let err = BankError::NegativeBalance {
            name: "alice".to_string(),
            amount: Decimal::new(-1000, 2),
        };
        assert!(!err.is_transient());
        assert!(!BankError::UnknownAccount("carol".to_string()).is_transient());
        assert!(!BankError::Hint(HintError::NotInTransaction).is_transient());
    }
}
