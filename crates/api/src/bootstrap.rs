//! First-start admin provisioning.
//!
//! Signup never grants the admin role, so the first admin comes from
//! `BOOTSTRAP_ADMIN_EMAIL` / `BOOTSTRAP_ADMIN_PASSWORD`.

use launchpad_core::error::CoreError;
use launchpad_core::roles::Role;
use launchpad_db::models::user::{CreateUser, User};
use launchpad_db::repositories::UserRepo;
use launchpad_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;

/// Create the configured admin if no user has that email yet.
///
/// Returns the new user, or `None` when the account already exists. An
/// existing account with that email keeps its current role.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<Option<User>> {
    let email = normalize_email(&admin.email);
    if let Some(existing) = UserRepo::find_by_email(pool, &email).await? {
        if existing.role_id != Role::Admin.id() {
            tracing::warn!(
                user_id = existing.id,
                "Bootstrap admin email belongs to a non-admin user"
            );
        }
        return Ok(None);
    }

    validate_password_strength(&admin.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            name: "Administrator".to_string(),
            password_hash,
            role_id: Role::Admin.id(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Bootstrap admin created");
    Ok(Some(user))
}
