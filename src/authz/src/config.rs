//! Guard and server configuration

use serde::Deserialize;

use crate::error::{AuthzError, Result};
use crate::roles::{GlobalRole, ScopedRole};

/// Which roles the guard treats specially, and where scope ids come from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Minimum global role that is allowed without any scope check
    pub hierarchy_threshold: GlobalRole,

    /// Scoped role allowed on every resource of the domain
    pub superuser_role: ScopedRole,

    /// Scoped role that needs an assignment on the requested resource
    pub operator_role: ScopedRole,

    /// Path parameter carrying the direct scope id
    pub direct_scope_param: String,

    /// Path parameter carrying the parent scope id
    pub parent_scope_param: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            hierarchy_threshold: GlobalRole::Admin,
            superuser_role: ScopedRole::CourseAdministrator,
            operator_role: ScopedRole::Instructor,
            direct_scope_param: "section_id".to_string(),
            parent_scope_param: "course_id".to_string(),
        }
    }
}

impl GuardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.superuser_role == self.operator_role {
            return Err(AuthzError::Config(format!(
                "superuser and operator role must differ (both are '{}')",
                self.superuser_role
            )));
        }

        if self.direct_scope_param.is_empty() || self.parent_scope_param.is_empty() {
            return Err(AuthzError::Config("scope parameter names cannot be empty".to_string()));
        }

        if self.direct_scope_param == self.parent_scope_param {
            return Err(AuthzError::Config(format!(
                "direct and parent scope parameters must differ (both are '{}')",
                self.direct_scope_param
            )));
        }

        Ok(())
    }
}

/// Decision server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// PostgreSQL connection string; the in-memory store is used when unset
    pub database_url: Option<String>,

    /// Guard settings
    pub guard: GuardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            database_url: None,
            guard: GuardConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// - `HOST` - bind address (default: 0.0.0.0)
    /// - `PORT` - HTTP port (default: 8080)
    /// - `RUST_LOG` - log level (default: info)
    /// - `DATABASE_URL` - PostgreSQL connection string
    /// - `AUTHZ_HIERARCHY_THRESHOLD` - global role allowed outright (default: admin)
    /// - `AUTHZ_SUPERUSER_ROLE` - domain superuser role (default: course_administrator)
    /// - `AUTHZ_OPERATOR_ROLE` - assignment-checked role (default: instructor)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut guard = GuardConfig::default();

        if let Some(threshold) = lookup("AUTHZ_HIERARCHY_THRESHOLD") {
            guard.hierarchy_threshold = threshold
                .parse()
                .map_err(|e| AuthzError::Config(format!("AUTHZ_HIERARCHY_THRESHOLD: {}", e)))?;
        }

        if let Some(role) = lookup("AUTHZ_SUPERUSER_ROLE") {
            guard.superuser_role = role
                .parse()
                .map_err(|e| AuthzError::Config(format!("AUTHZ_SUPERUSER_ROLE: {}", e)))?;
        }

        if let Some(role) = lookup("AUTHZ_OPERATOR_ROLE") {
            guard.operator_role = role
                .parse()
                .map_err(|e| AuthzError::Config(format!("AUTHZ_OPERATOR_ROLE: {}", e)))?;
        }

        guard.validate()?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            guard,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
