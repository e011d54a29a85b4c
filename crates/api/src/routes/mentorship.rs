use axum::routing::get;
use axum::Router;

use crate::handlers::mentorship;
use crate::state::AppState;

/// Routes mounted at `/mentorships`.
///
/// ```text
/// GET  /        -> list_mentorships
/// POST /        -> assign_mentor (admin only)
/// GET  /{id}    -> get_mentorship
/// PUT  /{id}    -> update_mentorship
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(mentorship::list_mentorships).post(mentorship::assign_mentor),
        )
        .route(
            "/{id}",
            get(mentorship::get_mentorship).put(mentorship::update_mentorship),
        )
}
