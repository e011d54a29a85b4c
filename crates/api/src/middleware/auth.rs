//! Bearer-token authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use launchpad_core::error::CoreError;
use launchpad_core::roles::{Actor, Role};
use launchpad_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller, as proven by a valid access token.
///
/// The role is read from the token, not the database, so a promotion only
/// shows up once the user obtains a new access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

/// The token part of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authentication required"))?
        .to_str()
        .map_err(|_| unauthorized("Malformed Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Expected Authorization: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let actor = state
            .config
            .jwt
            .verify_access_token(token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                unauthorized("Invalid or expired token")
            })?
            .actor();

        Ok(AuthUser {
            user_id: actor.id,
            role: actor.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/products");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer "), Some("abc")] {
            let parts = parts_with(header);
            assert!(matches!(
                bearer_token(&parts),
                Err(AppError::Core(CoreError::Unauthorized(_)))
            ));
        }
    }
}
