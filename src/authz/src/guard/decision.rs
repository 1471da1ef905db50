//! Authorization decision types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Assignment;

/// Outcome of a single guard evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// The principal may proceed
    Allow { grant: Grant },

    /// The principal must be stopped
    Deny { reason: DenialReason },
}

impl Decision {
    pub fn allow(grant: Grant) -> Self {
        Decision::Allow { grant }
    }

    pub fn deny(reason: DenialReason) -> Self {
        Decision::Deny { reason }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    /// The assignment that grounded the approval, if any
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Decision::Allow { grant: Grant::Assignment { assignment } } => Some(assignment),
            _ => None,
        }
    }

    pub fn denial(&self) -> Option<DenialReason> {
        match self {
            Decision::Deny { reason } => Some(*reason),
            Decision::Allow { .. } => None,
        }
    }

    /// Terminal state name, used in logs and responses
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Allow { grant } => grant.outcome(),
            Decision::Deny { reason } => reason.outcome(),
        }
    }
}

/// Why an allow decision was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Grant {
    /// Global role at or above the hierarchy threshold
    Hierarchy,

    /// Principal holds the domain-superuser scoped role
    DomainSuperuser,

    /// Principal holds a matching scoped assignment
    Assignment { assignment: Assignment },
}

impl Grant {
    pub fn outcome(&self) -> &'static str {
        match self {
            Grant::Hierarchy => "allowed_by_hierarchy",
            Grant::DomainSuperuser => "allowed_by_domain_superuser",
            Grant::Assignment { .. } => "allowed_by_assignment",
        }
    }
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No principal, or a principal without a global role
    Unauthenticated,

    /// Role is neither privileged in the hierarchy nor the scoped operator role
    InsufficientRole,

    /// Neither a direct nor a parent scope id was supplied
    MissingScope,

    /// A direct scope id was supplied but no assignment matches it
    NoDirectAssignment,

    /// Only a parent scope id was supplied and no assignment matches its children
    NoParentAssignment,
}

impl DenialReason {
    pub fn outcome(self) -> &'static str {
        match self {
            DenialReason::Unauthenticated => "unauthenticated",
            DenialReason::InsufficientRole => "denied_insufficient_role",
            DenialReason::MissingScope => "denied_missing_scope",
            DenialReason::NoDirectAssignment => "denied_no_direct_assignment",
            DenialReason::NoParentAssignment => "denied_no_parent_assignment",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DenialReason::Unauthenticated => "authentication required",
            DenialReason::InsufficientRole => "insufficient role for this resource",
            DenialReason::MissingScope => "a section id or course id is required",
            DenialReason::NoDirectAssignment => "not assigned to this section",
            DenialReason::NoParentAssignment => "not assigned to any section of this course",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_with_assignment() {
        let assignment = Assignment::new("a1", "inst-1", "s1");
        let decision = Decision::allow(Grant::Assignment { assignment: assignment.clone() });

        assert!(decision.is_allowed());
        assert_eq!(decision.assignment(), Some(&assignment));
        assert_eq!(decision.denial(), None);
        assert_eq!(decision.outcome(), "allowed_by_assignment");
    }

    #[test]
    fn test_deny() {
        let decision = Decision::deny(DenialReason::MissingScope);
        assert!(!decision.is_allowed());
        assert_eq!(decision.assignment(), None);
        assert_eq!(decision.denial(), Some(DenialReason::MissingScope));
        assert_eq!(decision.outcome(), "denied_missing_scope");
    }

    #[test]
    fn test_denial_messages_are_distinct() {
        let reasons = [
            DenialReason::Unauthenticated,
            DenialReason::InsufficientRole,
            DenialReason::MissingScope,
            DenialReason::NoDirectAssignment,
            DenialReason::NoParentAssignment,
        ];
        let messages: std::collections::HashSet<_> = reasons.iter().map(|r| r.message()).collect();
        assert_eq!(messages.len(), reasons.len());
    }

    #[test]
    fn test_decision_json_shape() {
        let json = serde_json::to_value(Decision::allow(Grant::Assignment {
            assignment: Assignment::new("a1", "inst-1", "s1"),
        }))
        .unwrap();
        assert_eq!(json["decision"], "allow");
        assert_eq!(json["grant"]["via"], "assignment");
        assert_eq!(json["grant"]["assignment"]["resourceId"], "s1");

        let json = serde_json::to_value(Decision::deny(DenialReason::NoParentAssignment)).unwrap();
        assert_eq!(json["decision"], "deny");
        assert_eq!(json["reason"], "no_parent_assignment");
    }
}
