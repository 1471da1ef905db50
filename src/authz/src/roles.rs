//! Role hierarchy table
//!
//! Global roles carry a rank and are compared against a threshold. Scoped
//! roles only mean something inside one resource domain; they are a separate
//! type with no rank and are only ever checked by identity.

use crate::error::AuthzError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rank reported for any role outside the global hierarchy
pub const UNRANKED: i32 = -1;

/// Roles participating in the global hierarchy, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    Customer,
    Viewer,
    Editor,
    Moderator,
    Admin,
    SuperAdmin,
}

impl GlobalRole {
    /// All global roles in ascending rank order
    pub const ALL: [GlobalRole; 6] = [
        GlobalRole::Customer,
        GlobalRole::Viewer,
        GlobalRole::Editor,
        GlobalRole::Moderator,
        GlobalRole::Admin,
        GlobalRole::SuperAdmin,
    ];

    pub fn rank(self) -> i32 {
        match self {
            GlobalRole::Customer => 0,
            GlobalRole::Viewer => 1,
            GlobalRole::Editor => 2,
            GlobalRole::Moderator => 3,
            GlobalRole::Admin => 4,
            GlobalRole::SuperAdmin => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlobalRole::Customer => "customer",
            GlobalRole::Viewer => "viewer",
            GlobalRole::Editor => "editor",
            GlobalRole::Moderator => "moderator",
            GlobalRole::Admin => "admin",
            GlobalRole::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlobalRole {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlobalRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthzError::InvalidInput(format!("Unknown global role: {}", s)))
    }
}

/// Roles that only apply within a resource domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopedRole {
    /// Operates on the sections they are assigned to
    Instructor,
    /// Operates on every section of every course
    CourseAdministrator,
}

impl ScopedRole {
    pub const ALL: [ScopedRole; 2] = [ScopedRole::Instructor, ScopedRole::CourseAdministrator];

    pub fn as_str(self) -> &'static str {
        match self {
            ScopedRole::Instructor => "instructor",
            ScopedRole::CourseAdministrator => "course_administrator",
        }
    }

    /// Identity check against a raw role name
    pub fn matches(self, role: &str) -> bool {
        self.as_str() == role
    }
}

impl fmt::Display for ScopedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopedRole {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScopedRole::ALL
            .into_iter()
            .find(|role| role.matches(s))
            .ok_or_else(|| AuthzError::InvalidInput(format!("Unknown scoped role: {}", s)))
    }
}

/// A raw role name classified into one of the two disjoint role kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Global(GlobalRole),
    Scoped(ScopedRole),
    Unrecognized(String),
}

impl Role {
    pub fn parse(name: &str) -> Self {
        if let Ok(role) = name.parse::<GlobalRole>() {
            Role::Global(role)
        } else if let Ok(role) = name.parse::<ScopedRole>() {
            Role::Scoped(role)
        } else {
            Role::Unrecognized(name.to_string())
        }
    }
}

/// Rank of a raw role name; [`UNRANKED`] for scoped and unknown roles
pub fn rank(role: &str) -> i32 {
    match Role::parse(role) {
        Role::Global(role) => role.rank(),
        Role::Scoped(_) | Role::Unrecognized(_) => UNRANKED,
    }
}

/// Whether `role` sits at or above `threshold` in the global hierarchy
pub fn has_minimum_rank(role: &str, threshold: GlobalRole) -> bool {
    let rank = rank(role);
    rank != UNRANKED && rank >= threshold.rank()
}
