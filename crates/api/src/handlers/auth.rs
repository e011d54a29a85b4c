//! Account creation and the token lifecycle.
//!
//! Every successful signup, login or refresh opens a new session row and
//! returns a fresh access/refresh pair.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use launchpad_core::error::CoreError;
use launchpad_core::roles::Role;
use launchpad_db::models::session::CreateSession;
use launchpad_db::models::user::{CreateUser, User, UserResponse};
use launchpad_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::RefreshToken;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const MAX_NAME_LENGTH: u64 = 100;
const MAX_USER_AGENT_CHARS: usize = 512;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    pub password: String,
    /// `entrepreneur` (default) or `mentor`.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// The opaque token from the previous auth response.
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Stored form of an email; lookups compare this exactly.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Same error for an unknown email and a wrong password.
fn invalid_credentials() -> AppError {
    CoreError::Unauthorized("Invalid email or password".into()).into()
}

fn invalid_input(msg: impl Into<String>) -> AppError {
    CoreError::Validation(msg.into()).into()
}

/// POST /api/v1/auth/signup
///
/// Admin accounts cannot be created here; see `BOOTSTRAP_ADMIN_EMAIL`.
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.email = normalize_email(&input.email);
    input.name = input.name.trim().to_string();
    input.validate().map_err(|e| invalid_input(e.to_string()))?;
    validate_password_strength(&input.password).map_err(invalid_input)?;

    let role = match input.role.as_deref() {
        Some(name) => name.parse::<Role>()?,
        None => Role::Entrepreneur,
    };
    if !role.is_self_assignable() {
        return Err(invalid_input(format!("Cannot sign up with role {role}")));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("hash password: {e}")))?;

    // uq_users_email -> 409
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            name: input.name,
            password_hash,
            role_id: role.id(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role, "User signed up");

    let response = create_auth_response(&state, &user, &headers).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid_credentials)?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("verify password: {e}")))?;
    if !matches {
        tracing::info!(user_id = user.id, "Login rejected, wrong password");
        return Err(invalid_credentials());
    }

    let response = create_auth_response(&state, &user, &headers).await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Trades a refresh token for a new pair. The presented token is consumed
/// in the same statement that checks it, so a replay gets 401.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let hash = RefreshToken::hash_of(&input.refresh_token);
    let session = SessionRepo::consume(&state.pool, &hash)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Refresh token is not valid".into()))?;

    // Sessions cascade with their user, so this only trips on a race.
    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Account no longer exists".into()))?;

    let response = create_auth_response(&state, &user, &headers).await?;
    tracing::debug!(user_id = user.id, session_id = session.id, "Refresh token rotated");
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Ends every session of the caller, on all devices. Access tokens already
/// issued stay valid until they expire.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Sign an access token and open a session holding the refresh token hash.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    headers: &HeaderMap,
) -> AppResult<AuthResponse> {
    let user_response = user.to_response()?;
    let jwt = &state.config.jwt;

    let access_token = jwt
        .issue_access_token(user.actor()?)
        .map_err(|e| AppError::InternalError(format!("sign access token: {e}")))?;

    let refresh = RefreshToken::generate();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            user_agent: user_agent(headers),
            expires_at: jwt.refresh_expires_at(),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh.plaintext,
        expires_in: jwt.access_ttl_secs(),
        user: user_response,
    })
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(USER_AGENT)?.to_str().ok()?;
    Some(value.chars().take(MAX_USER_AGENT_CHARS).collect())
}
