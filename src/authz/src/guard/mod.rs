//! Authorization guard
//!
//! Decides whether a principal may act on one resource instance. The checks
//! run cheapest first and each one is terminal:
//!
//! ```text
//! id and role? ─no─► Unauthenticated
//!     │
//! rank >= threshold ─► AllowedByHierarchy
//!     │
//! role == superuser ─► AllowedByDomainSuperuser
//!     │
//! role != operator ─► DeniedInsufficientRole
//!     │
//! scope? ─none─► DeniedMissingScope
//!     │
//! direct ─► find_assignment([id])          ─► AllowedByAssignment | DeniedNoDirectAssignment
//! parent ─► expand ─► find_assignment(ids) ─► AllowedByAssignment | DeniedNoParentAssignment
//! ```

pub mod decision;

pub use decision::{Decision, DenialReason, Grant};

use std::sync::Arc;
use tracing::debug;

use crate::config::GuardConfig;
use crate::error::Result;
use crate::resolver::AssignmentResolver;
use crate::roles::has_minimum_rank;
use crate::store::AssignmentStore;
use crate::types::{Principal, ResourceScope, ScopeParams};

/// Stateless scoped-access guard
///
/// Holds only its configuration and a handle to the assignment store, so one
/// instance can serve any number of concurrent evaluations.
#[derive(Clone)]
pub struct AuthorizationGuard {
    resolver: AssignmentResolver,
    config: GuardConfig,
}

impl AuthorizationGuard {
    /// Create a guard with the default role configuration
    pub fn new(store: Arc<dyn AssignmentStore>) -> Self {
        Self {
            resolver: AssignmentResolver::new(store),
            config: GuardConfig::default(),
        }
    }

    /// Create a guard with a custom configuration, rejecting invalid ones
    pub fn with_config(store: Arc<dyn AssignmentStore>, config: GuardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            resolver: AssignmentResolver::new(store),
            config,
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Evaluate one request
    ///
    /// Denials come back as `Ok(Decision::Deny { .. })`. An `Err` always means
    /// the assignment store failed and no decision could be reached.
    pub async fn evaluate(
        &self,
        principal: Option<&Principal>,
        scope: &ScopeParams,
    ) -> Result<Decision> {
        let Some((principal_id, role)) = principal.and_then(Principal::credentials) else {
            debug!("No authenticated principal");
            return Ok(Decision::deny(DenialReason::Unauthenticated));
        };

        if has_minimum_rank(role, self.config.hierarchy_threshold) {
            debug!(principal = principal_id, role, "Allowed by role hierarchy");
            return Ok(Decision::allow(Grant::Hierarchy));
        }

        if self.config.superuser_role.matches(role) {
            debug!(principal = principal_id, role, "Allowed as domain superuser");
            return Ok(Decision::allow(Grant::DomainSuperuser));
        }

        if !self.config.operator_role.matches(role) {
            debug!(principal = principal_id, role, "Role cannot hold scoped assignments");
            return Ok(Decision::deny(DenialReason::InsufficientRole));
        }

        let Some(resource_scope) = scope.resolve() else {
            debug!(principal = principal_id, "No scope id supplied");
            return Ok(Decision::deny(DenialReason::MissingScope));
        };

        let (scope_ids, not_found) = match &resource_scope {
            ResourceScope::Direct(id) => (vec![id.clone()], DenialReason::NoDirectAssignment),
            ResourceScope::Parent(id) => {
                let expanded = self.resolver.expand_parent_scope(id).await?;
                (expanded.into_iter().collect(), DenialReason::NoParentAssignment)
            }
        };

        let decision = match self.resolver.find_assignment(principal_id, &scope_ids).await? {
            Some(assignment) => Decision::allow(Grant::Assignment { assignment }),
            None => Decision::deny(not_found),
        };

        debug!(
            principal = principal_id,
            scope = resource_scope.id(),
            outcome = decision.outcome(),
            "Scoped assignment check complete"
        );

        Ok(decision)
    }
}
