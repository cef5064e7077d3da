//! Registry configuration.
//!
//! ```ignore
//! let config: DispatchConfig = serde_json::from_str(r#"{ "duplicate_policy": "replace" }"#)?;
//! let cqrs = Cqrs::builder().config(config).command(CreateUserHandler).build()?;
//! ```

use serde::{Deserialize, Serialize};

/// What `register` does when a binding for the same key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `DispatchError::DuplicateRegistration`; the first binding stays.
    #[default]
    Reject,
    /// The later registration wins.
    Replace,
}

/// Configuration for a handler registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub duplicate_policy: DuplicatePolicy,
}

impl DispatchConfig {
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
