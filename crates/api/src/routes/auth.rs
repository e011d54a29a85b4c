use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Session endpoints under `/auth`. Only `logout` needs a bearer token.
///
/// ```text
/// POST /signup   -> signup   (entrepreneur or mentor account + tokens)
/// POST /login    -> login    (tokens)
/// POST /refresh  -> refresh  (rotates the refresh token)
/// POST /logout   -> logout   (revokes every session of the caller)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
