//! Stored record types.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::hostcfg::HostConfig;
use crate::rules::Rule;

/// Length of a configuration record identifier.
pub const RECORD_ID_LEN: usize = 32;

/// Generate a random lowercase-hex record identifier.
pub fn generate_record_id() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; RECORD_ID_LEN / 2] = rng.gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Account plan tier. Free accounts are quota-limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Premium,
}

impl Plan {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "free" => Some(Self::Free),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

/// A user account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub plan: Plan,
}

/// A persisted host configuration: the validated envelope plus its
/// compiled expression chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleRecord {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub config: HostConfig,
    /// Compiled chain, sequence ids contiguous from 1
    pub expressions: Vec<Rule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RuleRecord {
    /// Build a fresh record with a generated id and current timestamps.
    pub fn new(user_id: impl Into<String>, config: HostConfig, expressions: Vec<Rule>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_record_id(),
            user_id: user_id.into(),
            config,
            expressions,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing entry: just enough for the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_are_32_lowercase_hex_chars() {
        for _ in 0..16 {
            let id = generate_record_id();
            assert_eq!(id.len(), RECORD_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn plan_defaults_to_free() {
        assert_eq!(Plan::default(), Plan::Free);
        assert_eq!(Plan::parse("premium"), Some(Plan::Premium));
        assert_eq!(Plan::parse("basic"), None);
    }
}
