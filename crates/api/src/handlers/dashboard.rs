//! Handlers for the `/dashboard` resource.

use axum::extract::{Query, State};
use axum::Json;
use launchpad_core::access::{mentorship_scope, product_scope};
use launchpad_core::dashboard::{
    summarize_mentorships, summarize_products, MentorshipSummary, ProductFacts, ProductSummary,
};
use launchpad_core::error::CoreError;
use launchpad_core::roles::Role;
use launchpad_core::status::{mentorship_status, product_status};
use launchpad_db::models::event::Event;
use launchpad_db::repositories::{EventRepo, MentorshipRepo, ProductRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Counts and rates over everything the caller can see.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub role: Role,
    pub products: ProductSummary,
    pub mentorships: MentorshipSummary,
}

/// GET /api/v1/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let actor = auth.actor();

    let product_rows =
        ProductRepo::list_facts(&state.pool, product_scope(&actor).owner_id()).await?;
    let facts = product_rows
        .into_iter()
        .map(|(status_id, funding_amount)| {
            Ok(ProductFacts {
                status: product_status(status_id)?,
                funding_amount,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let statuses = MentorshipRepo::list_statuses(&state.pool, mentorship_scope(&actor))
        .await?
        .into_iter()
        .map(mentorship_status)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse {
        data: DashboardSummary {
            role: actor.role,
            products: summarize_products(facts),
            mentorships: summarize_mentorships(statuses),
        },
    }))
}

/// GET /api/v1/dashboard/activity?limit=&offset=
///
/// Recent platform events, newest first.
pub async fn activity(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = EventRepo::list_recent(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(DataResponse { data: events }))
}
