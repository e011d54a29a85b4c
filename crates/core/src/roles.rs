//! Well-known roles and the acting identity.
//!
//! Role names and ids must match the seed data in
//! `20260301000002_create_roles_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MENTOR: &str = "mentor";
pub const ROLE_ENTREPRENEUR: &str = "entrepreneur";

/// A platform role. Every user carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Mentor,
    Entrepreneur,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::Admin, Role::Mentor, Role::Entrepreneur];

    /// Primary key of this role in the `roles` table.
    pub fn id(self) -> DbId {
        match self {
            Role::Admin => 1,
            Role::Mentor => 2,
            Role::Entrepreneur => 3,
        }
    }

    /// Inverse of [`Role::id`].
    pub fn from_id(id: DbId) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Mentor => ROLE_MENTOR,
            Role::Entrepreneur => ROLE_ENTREPRENEUR,
        }
    }

    /// Roles a visitor may pick for themselves at signup.
    pub fn is_self_assignable(self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid role '{s}'. Must be one of: {ROLE_ADMIN}, {ROLE_MENTOR}, {ROLE_ENTREPRENEUR}"
                ))
            })
    }
}

/// The authenticated identity performing an operation.
///
/// Supplied by the session layer and threaded explicitly into every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: DbId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
