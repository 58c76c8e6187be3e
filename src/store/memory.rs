//! In-memory storage implementation.
//!
//! Volatile storage for development and testing. All data is lost on
//! restart. Thread-safe via RwLock; lock scopes are short and never held
//! across awaits.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::hostcfg::HostConfig;
use crate::rules::Rule;

use super::types::{Plan, RuleRecord, RuleSummary, UserRecord};
use super::{Storage, StoreError};

/// In-memory storage backend.
#[derive(Default)]
pub struct MemoryStorage {
    rules: RwLock<HashMap<String, RuleRecord>>,
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        debug!("creating in-memory storage");
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert_rule(&self, record: RuleRecord) -> Result<(), StoreError> {
        let mut rules = self.rules.write().unwrap();
        rules.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_rule(&self, id: &str, user_id: &str) -> Result<Option<RuleRecord>, StoreError> {
        let rules = self.rules.read().unwrap();
        Ok(rules
            .get(id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn get_rule_any(&self, id: &str) -> Result<Option<RuleRecord>, StoreError> {
        let rules = self.rules.read().unwrap();
        Ok(rules.get(id).cloned())
    }

    async fn list_rules(&self, user_id: &str) -> Result<Vec<RuleSummary>, StoreError> {
        let rules = self.rules.read().unwrap();
        let mut summaries: Vec<RuleSummary> = rules
            .values()
            .filter(|r| r.user_id == user_id)
            .map(|r| RuleSummary {
                id: r.id.clone(),
                name: r.config.name.clone(),
            })
            .collect();
        // HashMap iteration order is arbitrary; keep listings stable
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn update_rule(
        &self,
        id: &str,
        user_id: &str,
        config: HostConfig,
        rules: Vec<Rule>,
    ) -> Result<bool, StoreError> {
        let mut records = self.rules.write().unwrap();
        match records.get_mut(id).filter(|r| r.user_id == user_id) {
            Some(record) => {
                record.config = config;
                record.expressions = rules;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_rule(&self, id: &str, user_id: &str) -> Result<bool, StoreError> {
        let mut records = self.rules.write().unwrap();
        match records.get(id) {
            Some(record) if record.user_id == user_id => {
                records.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_rules(&self, user_id: &str) -> Result<usize, StoreError> {
        let rules = self.rules.read().unwrap();
        Ok(rules.values().filter(|r| r.user_id == user_id).count())
    }

    async fn upsert_user(&self, user: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap();
        users.entry(user.id.clone()).or_insert(user);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<bool, StoreError> {
        let mut users = self.users.write().unwrap();
        match users.get_mut(user_id) {
            Some(user) => {
                user.plan = plan;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hostcfg::{FilterMode, Protocol};

    fn config(name: &str) -> HostConfig {
        HostConfig {
            name: name.to_string(),
            host: "example.com".to_string(),
            protocol: Protocol::Https,
            port: None,
            period: 60,
            duration: 60,
            frequency: 100,
            filter: FilterMode::All,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_scoped_by_owner() {
        let store = MemoryStorage::new();
        let record = RuleRecord::new("alice", config("r1"), vec![]);
        let id = record.id.clone();
        store.insert_rule(record).await.unwrap();

        assert!(store.get_rule(&id, "alice").await.unwrap().is_some());
        assert!(store.get_rule(&id, "bob").await.unwrap().is_none());
        assert!(store.get_rule_any(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn listing_is_per_user_and_sorted() {
        let store = MemoryStorage::new();
        store
            .insert_rule(RuleRecord::new("alice", config("zeta"), vec![]))
            .await
            .unwrap();
        store
            .insert_rule(RuleRecord::new("alice", config("alpha"), vec![]))
            .await
            .unwrap();
        store
            .insert_rule(RuleRecord::new("bob", config("other"), vec![]))
            .await
            .unwrap();

        let listed = store.list_rules("alice").await.unwrap();
        let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(store.count_rules("alice").await.unwrap(), 2);
        assert_eq!(store.count_rules("bob").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_replaces_wholesale_and_respects_ownership() {
        let store = MemoryStorage::new();
        let record = RuleRecord::new("alice", config("before"), vec![]);
        let id = record.id.clone();
        store.insert_rule(record).await.unwrap();

        assert!(!store
            .update_rule(&id, "bob", config("hijack"), vec![])
            .await
            .unwrap());

        assert!(store
            .update_rule(&id, "alice", config("after"), vec![])
            .await
            .unwrap());
        let fetched = store.get_rule(&id, "alice").await.unwrap().unwrap();
        assert_eq!(fetched.config.name, "after");
    }

    #[tokio::test]
    async fn delete_respects_ownership() {
        let store = MemoryStorage::new();
        let record = RuleRecord::new("alice", config("r1"), vec![]);
        let id = record.id.clone();
        store.insert_rule(record).await.unwrap();

        assert!(!store.delete_rule(&id, "bob").await.unwrap());
        assert!(store.delete_rule(&id, "alice").await.unwrap());
        assert!(store.get_rule_any(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_user_keeps_existing_plan() {
        let store = MemoryStorage::new();
        let user = UserRecord {
            id: "u1".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            plan: Plan::Free,
        };
        store.upsert_user(user.clone()).await.unwrap();
        assert!(store.set_plan("u1", Plan::Premium).await.unwrap());

        // Re-upserting the same identity must not downgrade the plan
        store.upsert_user(user).await.unwrap();
        let fetched = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(fetched.plan, Plan::Premium);

        assert!(!store.set_plan("ghost", Plan::Premium).await.unwrap());
    }
}
