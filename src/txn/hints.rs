//! Per-operation transaction configuration
//!
//! `TransactionBoundary` carries the retry budget and `TransactionHints`
//! the session settings injected into each attempt's transaction. Both
//! are built once at registration time and read many times; the
//! `HintRegistry` maps operation identity to its profile, replacing the
//! annotation-driven discovery of the original design.

use std::collections::HashMap;

/// Transaction priority hint (`SET TRANSACTION PRIORITY ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// SQL keyword for the priority clause.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Normal => "NORMAL",
            Priority::High => "HIGH",
        }
    }
}

/// Value of a named session setting.
///
/// Integers are inlined into the SET statement because the session-set
/// syntax does not accept bound parameters for identifier-like settings;
/// text values are bound as statement parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Int(u64),
    Text(String),
}

/// A named session variable, applied as one `SET <name> = ...` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetting {
    pub name: String,
    pub value: SettingValue,
}

impl SessionSetting {
    pub fn int(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value: SettingValue::Int(value),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SettingValue::Text(value.into()),
        }
    }
}

/// Session/transaction hints attached to one operation.
///
/// `follower_read` and `time_travel_interval` are mutually exclusive in
/// effect; follower-read wins. `timeout_secs == 0` disables timeout
/// injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHints {
    pub read_only: bool,
    pub timeout_secs: u64,
    pub follower_read: bool,
    pub time_travel_interval: Option<String>,
    pub priority: Priority,
    pub settings: Vec<SessionSetting>,
}

impl Default for TransactionHints {
    fn default() -> Self {
        Self {
            read_only: false,
            timeout_secs: 300,
            follower_read: false,
            time_travel_interval: None,
            priority: Priority::Normal,
            settings: Vec::new(),
        }
    }
}

impl TransactionHints {
    /// Read-only profile for point lookups.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Read-only profile served from follower replicas at a slightly
    /// stale timestamp.
    pub fn follower_read() -> Self {
        Self {
            read_only: true,
            follower_read: true,
            ..Self::default()
        }
    }
}

/// Retry budget for one operation: maximum total attempts, first try
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionBoundary {
    pub retry_attempts: u32,
}

impl Default for TransactionBoundary {
    fn default() -> Self {
        Self { retry_attempts: 3 }
    }
}

impl TransactionBoundary {
    pub fn with_attempts(retry_attempts: u32) -> Self {
        debug_assert!(retry_attempts >= 1, "retry budget must allow one attempt");
        Self { retry_attempts }
    }
}

/// Retry budget plus hints for one declared operation.
#[derive(Debug, Clone, Default)]
pub struct OperationProfile {
    pub boundary: TransactionBoundary,
    pub hints: TransactionHints,
}

impl OperationProfile {
    pub fn new(boundary: TransactionBoundary, hints: TransactionHints) -> Self {
        Self { boundary, hints }
    }

    pub fn with_hints(hints: TransactionHints) -> Self {
        Self {
            boundary: TransactionBoundary::default(),
            hints,
        }
    }
}

/// Mapping from operation identity to its transaction profile.
///
/// Operations not registered fall back to the default profile (3
/// attempts, plain read-write hints).
#[derive(Debug, Default)]
pub struct HintRegistry {
    profiles: HashMap<String, OperationProfile>,
    fallback: OperationProfile,
}

impl HintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, operation: impl Into<String>, profile: OperationProfile) {
        self.profiles.insert(operation.into(), profile);
    }

    pub fn lookup(&self, operation: &str) -> &OperationProfile {
        self.profiles.get(operation).unwrap_or(&self.fallback)
    }
}
