//! Handlers for `/users/me` (the caller's own profile).

use axum::extract::State;
use axum::Json;
use launchpad_core::access::{ensure_can_mutate, Action, Resource};
use launchpad_core::error::CoreError;
use launchpad_db::models::user::{UpdateProfile, UserResponse};
use launchpad_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_BIO_LENGTH: u64 = 2_000;

/// Request body for `PUT /users/me`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = MAX_BIO_LENGTH))]
    pub bio: Option<String>,
    #[validate(url)]
    pub profile_image: Option<String>,
}

/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: user.to_response()?,
    }))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(mut input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    ensure_can_mutate(
        &auth.actor(),
        &Resource::User { id: auth.user_id },
        Action::EditProfile,
    )?;

    input.name = input.name.map(|n| n.trim().to_string());
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let update = UpdateProfile {
        name: input.name,
        bio: input.bio,
        profile_image: input.profile_image,
    };
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(DataResponse {
        data: user.to_response()?,
    }))
}
