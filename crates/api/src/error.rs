//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": <message>, "code": <CODE>}`.
//! Rule-layer errors keep their message; database and internal errors are
//! logged and replaced with a generic one.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use launchpad_core::error::CoreError;
use launchpad_core::types::DbId;
use serde::Serialize;

/// Error type returned by every handler.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// A compare-and-set write matched no row: `entity` changed between the
    /// read and the write.
    pub fn stale(entity: &str, id: DbId) -> Self {
        AppError::Core(CoreError::Conflict(format!(
            "{entity} {id} was modified concurrently, reload and retry"
        )))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An internal error occurred")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Core(err) => core_error(err),
            AppError::Database(err) => database_error(&err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        };
        (status, Json(body)).into_response()
    }
}

fn core_error(err: CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", msg),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg)),
        CoreError::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("UNAUTHORIZED", msg),
        ),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg)),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// Message for a named constraint that a client can trip.
fn constraint_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        "uq_users_email" => Some("Email is already registered"),
        "uq_mentorships_product_id" => Some("Product already has a mentorship"),
        "ck_products_funding_amount" => {
            Some("funding_amount must be positive and set only for funded products")
        }
        _ => None,
    }
}

/// Map a database error to a response.
///
/// `RowNotFound` is 404, unique violations on `uq_*` constraints are 409 and
/// check violations on `ck_*` constraints are 400. Anything else is a 500.
fn database_error(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "Resource not found"),
            );
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal());
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    let classified = match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => Some((StatusCode::CONFLICT, "CONFLICT")),
        Some("23514") if constraint.starts_with("ck_") => {
            Some((StatusCode::BAD_REQUEST, "VALIDATION_ERROR"))
        }
        _ => None,
    };

    match classified {
        Some((status, code)) => {
            tracing::debug!(constraint, "Constraint violation");
            let message = constraint_message(constraint)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request violates constraint {constraint}"));
            (status, ErrorBody::new(code, message))
        }
        None => {
            tracing::error!(error = %db_err, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (CoreError::NotFound { entity: "Product", id: 1 }, StatusCode::NOT_FOUND),
            (CoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (CoreError::Conflict("x".into()), StatusCode::CONFLICT),
            (CoreError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (CoreError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::Core(err).into_response().status(), status);
        }
    }

    #[test]
    fn internal_details_are_hidden() {
        let (_, body) = core_error(CoreError::Internal("secret detail".into()));
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.error.contains("secret"));
    }

    #[test]
    fn row_not_found_is_404() {
        let (status, body) = database_error(&sqlx::Error::RowNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[test]
    fn known_constraints_have_messages() {
        assert!(constraint_message("uq_users_email").is_some());
        assert!(constraint_message("uq_mentorships_product_id").is_some());
        assert!(constraint_message("uq_roles_name").is_none());
    }
}
