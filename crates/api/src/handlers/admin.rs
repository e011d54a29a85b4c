//! Account management for admins: listing, inspecting and promoting users.

use axum::extract::{Path, Query, State};
use axum::Json;
use launchpad_core::error::CoreError;
use launchpad_core::roles::Role;
use launchpad_core::types::DbId;
use launchpad_db::models::user::{UpdateUser, UserResponse};
use launchpad_db::repositories::{MentorshipRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// `?role=admin|mentor|entrepreneur`
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub role: Option<String>,
}

/// Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email_verified: Option<bool>,
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /api/v1/admin/users?role=
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ListUsersParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let role = params.role.as_deref().map(str::parse::<Role>).transpose()?;
    let users = UserRepo::list(&state.pool, role).await?;
    let data = users
        .iter()
        .map(|u| u.to_response())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(DataResponse {
        data: user.to_response()?,
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Admins may not demote themselves; that keeps at least one admin around.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = input.role.as_deref().map(str::parse::<Role>).transpose()?;
    if id == admin.user_id && role.is_some_and(|r| r != Role::Admin) {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot change their own role".into(),
        )));
    }

    // Mentorships must keep pointing at a mentor.
    if let Some(new_role) = role.filter(|r| *r != Role::Mentor) {
        let current = UserRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| user_not_found(id))?
            .role()?;
        if current == Role::Mentor && MentorshipRepo::exists_for_mentor(&state.pool, id).await? {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "User {id} mentors existing mentorships and cannot become {new_role}"
            ))));
        }
    }

    let name = input.name.map(|n| n.trim().to_string());
    if name.as_deref().is_some_and(str::is_empty) {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be blank".into(),
        )));
    }

    let update = UpdateUser {
        name,
        role_id: role.map(Role::id),
        email_verified: input.email_verified,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = user.id,
        role_id = user.role_id,
        "User updated by admin"
    );
    Ok(Json(DataResponse {
        data: user.to_response()?,
    }))
}
