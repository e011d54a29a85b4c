//! Role gates for handler signatures.
//!
//! [`RequireAuth`] admits any signed-in user and [`RequireAdmin`] also checks
//! the role. Ownership and status rules need the loaded resource, so they
//! are decided later by `launchpad_core::access`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use launchpad_core::error::CoreError;
use launchpad_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then reject with 403 unless the role is one of `allowed`.
async fn gate(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[Role],
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed.contains(&user.role) {
        Ok(user)
    } else {
        tracing::debug!(user_id = user.user_id, role = %user.role, "Role gate rejected request");
        Err(AppError::Core(CoreError::Forbidden(format!(
            "Requires role {}",
            allowed
                .iter()
                .map(Role::to_string)
                .collect::<Vec<_>>()
                .join(" or ")
        ))))
    }
}

/// Admin-only handlers: user management, mentor assignment, activity feed.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(parts, state, &[Role::Admin]).await.map(RequireAdmin)
    }
}

/// Any role. Per-resource checks happen in the handler.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(parts, state, Role::ALL).await.map(RequireAuth)
    }
}
