//! Assignment resolution
//!
//! Two explicit phases: expand a parent scope into its direct scope ids, then
//! look for an assignment on any of them. Both are plain reads against the
//! [`AssignmentStore`]; store errors are returned as-is.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::AssignmentStore;
use crate::types::Assignment;

/// Resolves whether a principal holds a scoped assignment
#[derive(Clone)]
pub struct AssignmentResolver {
    store: Arc<dyn AssignmentStore>,
}

impl AssignmentResolver {
    pub fn new(store: Arc<dyn AssignmentStore>) -> Self {
        Self { store }
    }

    /// Expand a parent scope id into the set of its direct scope ids
    ///
    /// A parent with no children yields an empty set, not an error.
    pub async fn expand_parent_scope(&self, parent_id: &str) -> Result<BTreeSet<String>> {
        let ids = self
            .store
            .list_direct_scope_ids_for_parent(parent_id)
            .await
            .map_err(|e| {
                warn!(parent_id, error = %e, "Failed to expand parent scope");
                e
            })?;

        let expanded: BTreeSet<String> = ids.into_iter().collect();
        debug!(parent_id, children = expanded.len(), "Expanded parent scope");
        Ok(expanded)
    }

    /// Find an assignment for `user_id` on any of `scope_ids`
    ///
    /// An empty id set cannot match anything and skips the store.
    pub async fn find_assignment(
        &self,
        user_id: &str,
        scope_ids: &[String],
    ) -> Result<Option<Assignment>> {
        if scope_ids.is_empty() {
            debug!(user_id, "No scope ids to match, skipping assignment lookup");
            return Ok(None);
        }

        let assignment = self
            .store
            .find_assignment_for_user_and_scopes(user_id, scope_ids)
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "Failed to look up assignment");
                e
            })?;

        debug!(
            user_id,
            scopes = scope_ids.len(),
            found = assignment.is_some(),
            "Assignment lookup complete"
        );
        Ok(assignment)
    }
}
