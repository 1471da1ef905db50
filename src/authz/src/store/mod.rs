//! Assignment storage
//!
//! The guard only ever reads through [`AssignmentStore`]. Assignments are
//! created and removed by an administrative workflow elsewhere; the write
//! helpers on [`InMemoryAssignmentStore`] exist for seeding and tests.

use crate::error::Result;
use crate::types::Assignment;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresAssignmentStore;

/// Read contract for scope hierarchy and assignment lookups
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// List the direct scope ids (e.g., section ids) under a parent scope
    async fn list_direct_scope_ids_for_parent(&self, parent_id: &str) -> Result<Vec<String>>;

    /// Find one assignment for `user_id` whose resource id is in `scope_ids`
    async fn find_assignment_for_user_and_scopes(
        &self,
        user_id: &str,
        scope_ids: &[String],
    ) -> Result<Option<Assignment>>;
}

/// In-memory assignment store implementation
pub struct InMemoryAssignmentStore {
    /// parent scope id -> direct scope ids
    children: Arc<RwLock<HashMap<String, Vec<String>>>>,
    assignments: Arc<RwLock<Vec<Assignment>>>,
}

impl InMemoryAssignmentStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self {
            children: Arc::new(RwLock::new(HashMap::new())),
            assignments: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register `scope_id` as a child of `parent_id`
    pub async fn add_scope(&self, parent_id: impl Into<String>, scope_id: impl Into<String>) {
        let scope_id = scope_id.into();
        let mut children = self.children.write().await;
        let entry = children.entry(parent_id.into()).or_default();
        if !entry.contains(&scope_id) {
            entry.push(scope_id);
        }
    }

    /// Store an assignment
    pub async fn add_assignment(&self, assignment: Assignment) {
        let mut assignments = self.assignments.write().await;
        assignments.push(assignment);
    }

    /// Remove an assignment by id
    pub async fn remove_assignment(&self, id: &str) {
        let mut assignments = self.assignments.write().await;
        assignments.retain(|a| a.id != id);
    }
}

impl Default for InMemoryAssignmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn list_direct_scope_ids_for_parent(&self, parent_id: &str) -> Result<Vec<String>> {
        let children = self.children.read().await;
        Ok(children.get(parent_id).cloned().unwrap_or_default())
    }

    async fn find_assignment_for_user_and_scopes(
        &self,
        user_id: &str,
        scope_ids: &[String],
    ) -> Result<Option<Assignment>> {
        let assignments = self.assignments.read().await;
        Ok(assignments
            .iter()
            .find(|a| a.user_id == user_id && scope_ids.contains(&a.resource_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_children() {
        let store = InMemoryAssignmentStore::new();
        store.add_scope("c1", "s1").await;
        store.add_scope("c1", "s2").await;
        store.add_scope("c1", "s2").await;

        let ids = store.list_direct_scope_ids_for_parent("c1").await.unwrap();
        assert_eq!(ids, vec!["s1".to_string(), "s2".to_string()]);

        let none = store.list_direct_scope_ids_for_parent("c2").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_find_assignment_matches_user_and_scope() {
        let store = InMemoryAssignmentStore::new();
        store.add_assignment(Assignment::new("a1", "inst-1", "s2")).await;

        let ids = vec!["s1".to_string(), "s2".to_string()];
        let found = store.find_assignment_for_user_and_scopes("inst-1", &ids).await.unwrap();
        assert_eq!(found, Some(Assignment::new("a1", "inst-1", "s2")));

        let other_user = store.find_assignment_for_user_and_scopes("inst-2", &ids).await.unwrap();
        assert!(other_user.is_none());

        let other_scope = store
            .find_assignment_for_user_and_scopes("inst-1", &["s1".to_string()])
            .await
            .unwrap();
        assert!(other_scope.is_none());
    }

    #[tokio::test]
    async fn test_remove_assignment() {
        let store = InMemoryAssignmentStore::new();
        store.add_assignment(Assignment::new("a1", "inst-1", "s1")).await;
        store.remove_assignment("a1").await;

        let found = store
            .find_assignment_for_user_and_scopes("inst-1", &["s1".to_string()])
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
