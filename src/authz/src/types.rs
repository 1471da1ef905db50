//! Core authorization types

use serde::{Deserialize, Serialize};

/// Authenticated principal, as produced by the upstream authentication layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Principal identifier (e.g., "inst-1"); may be missing
    #[serde(default)]
    pub id: String,

    /// Global role name (e.g., "admin", "instructor"); may be missing
    #[serde(default, alias = "role")]
    pub global_role: Option<String>,
}

impl Principal {
    /// Create a principal with a global role
    pub fn new(id: impl Into<String>, global_role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            global_role: Some(global_role.into()),
        }
    }

    /// Create a principal that carries no global role
    pub fn without_role(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            global_role: None,
        }
    }

    /// The identifier, treating an empty string as absent
    pub fn id(&self) -> Option<&str> {
        Some(self.id.as_str()).filter(|id| !id.is_empty())
    }

    /// The global role, treating an empty string as absent
    pub fn role(&self) -> Option<&str> {
        self.global_role.as_deref().filter(|r| !r.is_empty())
    }

    /// Identifier and role together, or `None` unless both are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.id()?, self.role()?))
    }
}

/// Persisted record asserting that `user_id` has scoped access to `resource_id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Assignment {
    /// Assignment identifier
    pub id: String,

    /// User holding the assignment
    pub user_id: String,

    /// Direct scope (e.g., section) the assignment grants access to
    pub resource_id: String,
}

impl Assignment {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            resource_id: resource_id.into(),
        }
    }
}

/// Scope identifiers extracted from the request by the calling framework
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeParams {
    /// Direct scope id (e.g., a section id)
    #[serde(default, alias = "sectionId")]
    pub direct_scope_id: Option<String>,

    /// Parent scope id (e.g., a course id) to expand into direct scope ids
    #[serde(default, alias = "courseId")]
    pub parent_scope_id: Option<String>,
}

impl ScopeParams {
    /// Scope naming a single direct resource
    pub fn direct(id: impl Into<String>) -> Self {
        Self {
            direct_scope_id: Some(id.into()),
            parent_scope_id: None,
        }
    }

    /// Scope naming a parent resource only
    pub fn parent(id: impl Into<String>) -> Self {
        Self {
            direct_scope_id: None,
            parent_scope_id: Some(id.into()),
        }
    }

    /// Attach a parent id to an existing scope
    pub fn with_parent(mut self, id: impl Into<String>) -> Self {
        self.parent_scope_id = Some(id.into());
        self
    }

    /// Pick the scope to resolve. A direct id wins over a parent id and empty
    /// ids count as absent.
    pub fn resolve(&self) -> Option<ResourceScope> {
        let non_empty = |id: &Option<String>| id.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);

        non_empty(&self.direct_scope_id)
            .map(ResourceScope::Direct)
            .or_else(|| non_empty(&self.parent_scope_id).map(ResourceScope::Parent))
    }
}

/// The resolved target of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceScope {
    /// A direct scope id, matched against assignments as-is
    Direct(String),

    /// A parent scope id, expanded to its direct scope ids first
    Parent(String),
}

impl ResourceScope {
    pub fn id(&self) -> &str {
        match self {
            ResourceScope::Direct(id) | ResourceScope::Parent(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_role() {
        assert_eq!(Principal::new("u1", "admin").role(), Some("admin"));
        assert_eq!(Principal::without_role("u1").role(), None);
        assert_eq!(Principal::new("u1", "").role(), None);
    }

    #[test]
    fn test_principal_credentials_need_both_fields() {
        assert_eq!(Principal::new("u1", "admin").credentials(), Some(("u1", "admin")));
        assert_eq!(Principal::new("", "admin").id(), None);
        assert_eq!(Principal::new("", "admin").credentials(), None);
        assert_eq!(Principal::without_role("u1").credentials(), None);
    }

    #[test]
    fn test_principal_deserialize_aliases() {
        let principal: Principal =
            serde_json::from_str(r#"{"id":"inst-1","role":"instructor"}"#).unwrap();
        assert_eq!(principal.role(), Some("instructor"));

        let principal: Principal = serde_json::from_str(r#"{"id":"inst-1"}"#).unwrap();
        assert_eq!(principal.global_role, None);

        let principal: Principal = serde_json::from_str(r#"{"globalRole":"admin"}"#).unwrap();
        assert_eq!(principal.id(), None);
        assert_eq!(principal.credentials(), None);
    }

    #[test]
    fn test_scope_prefers_direct_id() {
        let scope = ScopeParams::direct("s1").with_parent("c1");
        assert_eq!(scope.resolve(), Some(ResourceScope::Direct("s1".to_string())));
    }

    #[test]
    fn test_scope_falls_back_to_parent() {
        assert_eq!(
            ScopeParams::parent("c1").resolve(),
            Some(ResourceScope::Parent("c1".to_string()))
        );

        let scope = ScopeParams {
            direct_scope_id: Some(String::new()),
            parent_scope_id: Some("c1".to_string()),
        };
        assert_eq!(scope.resolve(), Some(ResourceScope::Parent("c1".to_string())));
    }

    #[test]
    fn test_scope_missing() {
        assert_eq!(ScopeParams::default().resolve(), None);
    }

    #[test]
    fn test_scope_params_from_route_names() {
        let scope: ScopeParams = serde_json::from_str(r#"{"courseId":"c1"}"#).unwrap();
        assert_eq!(scope.resolve(), Some(ResourceScope::Parent("c1".to_string())));
    }
}
