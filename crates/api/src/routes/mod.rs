pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod mentorship;
pub mod product;
pub mod profile;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                 signup (public)
/// /auth/login                  login (public)
/// /auth/refresh                refresh (public)
/// /auth/logout                 logout (requires auth)
///
/// /users/me                    own profile: get, update
///
/// /admin/users                 list (admin only, ?role=)
/// /admin/users/{id}            get, update (admin only)
///
/// /products                    list (?status=), submit
/// /products/{id}               get (with mentorship), edit details
/// /products/{id}/status        change status
///
/// /mentorships                 list (?status=), assign (admin only)
/// /mentorships/{id}            get, update status / notes / mentor
///
/// /dashboard/summary           counts and rates for the caller
/// /dashboard/activity          recent events (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", profile::router())
        .nest("/admin", admin::router())
        .nest("/products", product::router())
        .nest("/mentorships", mentorship::router())
        .nest("/dashboard", dashboard::router())
}
