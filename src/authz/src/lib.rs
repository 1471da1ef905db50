//! # Scoped Authorization Engine
//!
//! Decides whether an authenticated principal may act on one specific
//! resource instance, combining a global role hierarchy with scoped role
//! assignments (e.g. instructors assigned to course sections).
//!
//! ## Features
//!
//! - **Role hierarchy** with ranked global roles and identity-checked scoped roles
//! - **Two-phase assignment resolution**: direct scope match, or parent scope
//!   expanded into its direct scopes
//! - **Typed decisions** carrying the grounding assignment or a specific denial reason
//! - **Pluggable stores**: in-memory and PostgreSQL (sqlx)
//! - **axum adapter** running the guard as route middleware
//!
//! ## Example
//!
//! ```rust
//! use scoped_authz::{Assignment, AuthorizationGuard, InMemoryAssignmentStore, Principal, ScopeParams};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryAssignmentStore::new();
//! store.add_scope("c1", "s1").await;
//! store.add_assignment(Assignment::new("a1", "inst-1", "s1")).await;
//!
//! let guard = AuthorizationGuard::new(Arc::new(store));
//! let principal = Principal::new("inst-1", "instructor");
//!
//! let decision = guard.evaluate(Some(&principal), &ScopeParams::parent("c1")).await?;
//! assert!(decision.is_allowed());
//! assert_eq!(decision.assignment().map(|a| a.id.as_str()), Some("a1"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod resolver;
pub mod roles;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{GuardConfig, ServerConfig};
pub use error::{AuthzError, Result};
pub use guard::{AuthorizationGuard, Decision, DenialReason, Grant};
pub use resolver::AssignmentResolver;
pub use roles::{has_minimum_rank, rank, GlobalRole, Role, ScopedRole, UNRANKED};
pub use store::{AssignmentStore, InMemoryAssignmentStore};
pub use types::{Assignment, Principal, ResourceScope, ScopeParams};

#[cfg(feature = "postgres")]
pub use store::PostgresAssignmentStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
