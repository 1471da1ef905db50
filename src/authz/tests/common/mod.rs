//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use scoped_authz::{
    Assignment, AssignmentStore, AuthzError, InMemoryAssignmentStore, Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Store wrapper counting every read that reaches the backing store
pub struct CountingStore {
    inner: InMemoryAssignmentStore,
    expansions: AtomicUsize,
    lookups: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: InMemoryAssignmentStore) -> Self {
        Self {
            inner,
            expansions: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn expansions(&self) -> usize {
        self.expansions.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn total_queries(&self) -> usize {
        self.expansions() + self.lookups()
    }
}

#[async_trait]
impl AssignmentStore for CountingStore {
    async fn list_direct_scope_ids_for_parent(&self, parent_id: &str) -> Result<Vec<String>> {
        self.expansions.fetch_add(1, Ordering::SeqCst);
        self.inner.list_direct_scope_ids_for_parent(parent_id).await
    }

    async fn find_assignment_for_user_and_scopes(
        &self,
        user_id: &str,
        scope_ids: &[String],
    ) -> Result<Option<Assignment>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner
            .find_assignment_for_user_and_scopes(user_id, scope_ids)
            .await
    }
}

/// Store whose every read fails, as an unreachable database would
pub struct FailingStore;

#[async_trait]
impl AssignmentStore for FailingStore {
    async fn list_direct_scope_ids_for_parent(&self, _parent_id: &str) -> Result<Vec<String>> {
        Err(AuthzError::DatabaseError("connection refused".to_string()))
    }

    async fn find_assignment_for_user_and_scopes(
        &self,
        _user_id: &str,
        _scope_ids: &[String],
    ) -> Result<Option<Assignment>> {
        Err(AuthzError::DatabaseError("connection refused".to_string()))
    }
}

/// Course c1 with sections s1 and s2, course c2 with section s3.
/// inst-1 is assigned to s2 and inst-2 to s1.
pub async fn course_fixture() -> InMemoryAssignmentStore {
    let store = InMemoryAssignmentStore::new();
    store.add_scope("c1", "s1").await;
    store.add_scope("c1", "s2").await;
    store.add_scope("c2", "s3").await;
    store
        .add_assignment(Assignment::new("a-inst-1-s2", "inst-1", "s2"))
        .await;
    store
        .add_assignment(Assignment::new("a-inst-2-s1", "inst-2", "s1"))
        .await;
    store
}
