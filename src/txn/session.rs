//! Session hint applier
//!
//! Turns a [`TransactionHints`] descriptor into an ordered plan of
//! session-configuration statements and issues them on an open
//! transaction before the business logic runs. The order is fixed:
//! some settings are positional or overriding in the underlying engine
//! (follower-read and time-travel both set the transaction read
//! timestamp, so only one may be issued).
//!
//! Statement errors propagate unmodified; classifying them as transient
//! or fatal is the retry coordinator's job one layer up.

use sqlx::{Postgres, Transaction};
use thiserror::Error;

use super::classify::Transient;
use super::context::TxnContext;
use super::hints::{SettingValue, TransactionHints};

/// One session-configuration statement of the hint plan.
///
/// Integer setting values are inlined because the session-set syntax
/// does not accept bound parameters everywhere; text values are bound.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatement {
    Raw(String),
    BindInt(String, i64),
    BindText(String, String),
}

#[derive(Debug, Error)]
pub enum HintError {
    /// No transaction was active when the applier ran. Programming
    /// error; fatal, never retried.
    #[error("transaction not active when applying session hints")]
    NotInTransaction,

    /// A hint statement failed; propagated unmodified.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl Transient for HintError {
    fn is_transient(&self) -> bool {
        match self {
            HintError::NotInTransaction => false,
            HintError::Database(e) => e.is_transient(),
        }
    }
}

/// Build the ordered statement plan for one transaction attempt.
pub fn session_statements(app_name: &str, hints: &TransactionHints) -> Vec<SessionStatement> {
    let mut plan = Vec::new();

    plan.push(SessionStatement::Raw(format!(
        "SET application_name = '{}'",
        app_name.replace('\'', "''")
    )));

    plan.push(SessionStatement::Raw(format!(
        "SET TRANSACTION PRIORITY {}",
        hints.priority.as_sql()
    )));

    if hints.follower_read {
        plan.push(SessionStatement::Raw(
            "SET TRANSACTION AS OF SYSTEM TIME follower_read_timestamp()".to_string(),
        ));
    } else if let Some(interval) = hints
        .time_travel_interval
        .as_deref()
        .filter(|i| !i.is_empty())
    {
        plan.push(SessionStatement::Raw(format!(
            "SET TRANSACTION AS OF SYSTEM TIME INTERVAL '{}'",
            interval
        )));
    }

    if hints.timeout_secs > 0 {
        plan.push(SessionStatement::BindInt(
            "SET statement_timeout = $1".to_string(),
            (hints.timeout_secs * 1000) as i64,
        ));
    }

    if hints.read_only {
        plan.push(SessionStatement::Raw(
            "SET transaction_read_only = true".to_string(),
        ));
    }

    for setting in &hints.settings {
        match &setting.value {
            SettingValue::Int(v) => plan.push(SessionStatement::Raw(format!(
                "SET {} = {}",
                setting.name, v
            ))),
            SettingValue::Text(v) => plan.push(SessionStatement::BindText(
                format!("SET {} = $1", setting.name),
                v.clone(),
            )),
        }
    }

    plan
}

/// Issue the hint plan on an already-active transaction, in plan order.
pub async fn apply(
    ctx: TxnContext,
    tx: &mut Transaction<'_, Postgres>,
    app_name: &str,
    hints: &TransactionHints,
) -> Result<(), HintError> {
    if !ctx.is_transaction_active() {
        return Err(HintError::NotInTransaction);
    }

    for statement in session_statements(app_name, hints) {
        match statement {
            SessionStatement::Raw(sql) => {
                sqlx::query(&sql).execute(&mut **tx).await?;
            }
            SessionStatement::BindInt(sql, value) => {
                sqlx::query(&sql).bind(value).execute(&mut **tx).await?;
            }
            SessionStatement::BindText(sql, value) => {
                sqlx::query(&sql).bind(value).execute(&mut **tx).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::hints::{Priority, SessionSetting};

    fn raw(sql: &str) -> SessionStatement {
        SessionStatement::Raw(sql.to_string())
    }

    #[test]
    fn test_default_hint_plan_order() {
        let plan = session_statements("roachbank", &TransactionHints::default());
        assert_eq!(
            plan,
            vec![
                raw("SET application_name = 'roachbank'"),
                raw("SET TRANSACTION PRIORITY NORMAL"),
                SessionStatement::BindInt("SET statement_timeout = $1".to_string(), 300_000),
            ]
        );
    }

    #[test]
    fn test_follower_read_suppresses_time_travel() {
        let hints = TransactionHints {
            follower_read: true,
            time_travel_interval: Some("-30s".to_string()),
            ..TransactionHints::default()
        };
        let plan = session_statements("roachbank", &hints);

        assert!(plan.contains(&raw(
            "SET TRANSACTION AS OF SYSTEM TIME follower_read_timestamp()"
        )));
        assert!(
            !plan
                .iter()
                .any(|s| matches!(s, SessionStatement::Raw(sql) if sql.contains("INTERVAL"))),
            "time-travel statement must never be issued alongside follower read"
        );
    }

    #[test]
    fn test_time_travel_interval() {
        let hints = TransactionHints {
            time_travel_interval: Some("-30s".to_string()),
            ..TransactionHints::default()
        };
        let plan = session_statements("roachbank", &hints);
        assert!(plan.contains(&raw("SET TRANSACTION AS OF SYSTEM TIME INTERVAL '-30s'")));
    }

    #[test]
    fn test_empty_interval_is_absent() {
        let hints = TransactionHints {
            time_travel_interval: Some(String::new()),
            ..TransactionHints::default()
        };
        let plan = session_statements("roachbank", &hints);
        assert!(
            !plan
                .iter()
                .any(|s| matches!(s, SessionStatement::Raw(sql) if sql.contains("AS OF SYSTEM TIME")))
        );
    }

    #[test]
    fn test_zero_timeout_disables_injection() {
        let hints = TransactionHints {
            timeout_secs: 0,
            ..TransactionHints::default()
        };
        let plan = session_statements("roachbank", &hints);
        assert!(
            !plan
                .iter()
                .any(|s| matches!(s, SessionStatement::BindInt(sql, _) if sql.contains("statement_timeout")))
        );
    }

    #[test]
    fn test_read_only_and_priority() {
        let hints = TransactionHints {
            read_only: true,
            priority: Priority::High,
            ..TransactionHints::default()
        };
        let plan = session_statements("roachbank", &hints);
        assert!(plan.contains(&raw("SET TRANSACTION PRIORITY HIGH")));
        assert!(plan.contains(&raw("SET transaction_read_only = true")));
    }

    #[test]
    fn test_named_settings_inline_vs_bind_in_order() {
        let hints = TransactionHints {
            settings: vec![
                SessionSetting::int("idle_in_transaction_session_timeout", 5000),
                SessionSetting::text("default_int_size", "8"),
            ],
            ..TransactionHints::default()
        };
        let plan = session_statements("roachbank", &hints);
        let tail = &plan[plan.len() - 2..];

        assert_eq!(
            tail[0],
            raw("SET idle_in_transaction_session_timeout = 5000")
        );
        assert_eq!(
            tail[1],
            SessionStatement::BindText("SET default_int_size = $1".to_string(), "8".to_string())
        );
    }

    #[test]
    fn test_application_name_comes_first_priority_second() {
        let hints = TransactionHints {
            read_only: true,
            follower_read: true,
            settings: vec![SessionSetting::int("foo", 1)],
            ..TransactionHints::default()
        };
        let plan = session_statements("bank'app", &hints);

        assert_eq!(plan[0], raw("SET application_name = 'bank''app'"));
        assert_eq!(plan[1], raw("SET TRANSACTION PRIORITY NORMAL"));
        // Read timestamp mode before timeout, before read-only, before
        // named settings.
        let kinds: Vec<&str> = plan
            .iter()
            .map(|s| match s {
                SessionStatement::Raw(sql) if sql.contains("AS OF SYSTEM TIME") => "timestamp",
                SessionStatement::Raw(sql) if sql.contains("read_only") => "read_only",
                SessionStatement::BindInt(sql, _) if sql.contains("timeout") => "timeout",
                SessionStatement::Raw(sql) if sql.starts_with("SET foo") => "setting",
                _ => "other",
            })
            .collect();
        let positions: Vec<usize> = ["timestamp", "timeout", "read_only", "setting"]
            .iter()
            .map(|k| kinds.iter().position(|x| x == k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
