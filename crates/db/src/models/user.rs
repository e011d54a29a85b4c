//! Accounts. The role lives in `role_id`; [`User::role`] turns it back into
//! a [`Role`].

use launchpad_core::error::CoreError;
use launchpad_core::mentorship::UserRef;
use launchpad_core::roles::{Actor, Role};
use launchpad_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `users` row, password hash included. Not `Serialize`: responses go
/// through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub email_verified: bool,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Fails only if the row references a role id outside [`Role::ALL`],
    /// which the seed migration rules out.
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::from_id(self.role_id).ok_or_else(|| {
            CoreError::Internal(format!("role id {} on user {}", self.role_id, self.id))
        })
    }

    pub fn actor(&self) -> Result<Actor, CoreError> {
        self.role().map(|role| Actor::new(self.id, role))
    }

    /// The mentor side of an assignment check.
    pub fn user_ref(&self) -> Result<UserRef, CoreError> {
        self.role().map(|role| UserRef { id: self.id, role })
    }

    pub fn to_response(&self) -> Result<UserResponse, CoreError> {
        let role = self.role()?;
        let User {
            id,
            email,
            name,
            email_verified,
            bio,
            profile_image,
            created_at,
            updated_at,
            ..
        } = self.clone();
        Ok(UserResponse {
            id,
            email,
            name,
            role,
            email_verified,
            bio,
            profile_image,
            created_at,
            updated_at,
        })
    }
}

/// What clients see of an account.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub email_verified: bool,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload. `email` is expected lowercased and `password_hash` is an
/// Argon2 PHC string.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role_id: DbId,
}

/// Fields an admin may change on any account. `None` leaves the column.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role_id: Option<DbId>,
    pub email_verified: Option<bool>,
}

/// Fields a user may change on their own account. `None` leaves the column.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}
