//! Datastore abstraction.
//!
//! One record per host configuration, keyed by a 32-character random
//! identifier and owned by a user account. The relational backend itself is
//! an external collaborator; this trait is the seam, and the in-memory
//! implementation backs development and tests.
//!
//! The quota check-then-insert sequence performed by the handlers is
//! best-effort: no transactional guarantee is assumed against the backend,
//! and a rare race under concurrent submissions from one account may
//! transiently admit one extra record.

mod memory;
mod types;

pub use memory::MemoryStorage;
pub use types::{generate_record_id, Plan, RuleRecord, RuleSummary, UserRecord, RECORD_ID_LEN};

use async_trait::async_trait;
use thiserror::Error;

use crate::hostcfg::HostConfig;
use crate::rules::Rule;

/// Datastore failure. Deterministic validation never lands here; these are
/// backend faults the caller may retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage backend for host configurations and user accounts.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a new configuration record.
    async fn insert_rule(&self, record: RuleRecord) -> Result<(), StoreError>;

    /// Fetch a record owned by `user_id`.
    async fn get_rule(&self, id: &str, user_id: &str) -> Result<Option<RuleRecord>, StoreError>;

    /// Fetch a record by id alone. Used by the enforcement gateway, which
    /// has no user scope.
    async fn get_rule_any(&self, id: &str) -> Result<Option<RuleRecord>, StoreError>;

    /// List `{id, name}` summaries for the user's records.
    async fn list_rules(&self, user_id: &str) -> Result<Vec<RuleSummary>, StoreError>;

    /// Replace an owned record wholesale. Returns `false` if no record
    /// matched.
    async fn update_rule(
        &self,
        id: &str,
        user_id: &str,
        config: HostConfig,
        rules: Vec<Rule>,
    ) -> Result<bool, StoreError>;

    /// Delete an owned record. Returns `false` if no record matched.
    async fn delete_rule(&self, id: &str, user_id: &str) -> Result<bool, StoreError>;

    /// Number of records the user owns (plan quota input).
    async fn count_rules(&self, user_id: &str) -> Result<usize, StoreError>;

    /// Insert a user if absent; existing records keep their plan.
    async fn upsert_user(&self, user: UserRecord) -> Result<(), StoreError>;

    /// Fetch a user record.
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Change a user's plan. Returns `false` if the user is unknown.
    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<bool, StoreError>;
}
