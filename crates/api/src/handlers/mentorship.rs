//! Handlers for the `/mentorships` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use launchpad_core::access::{ensure_can_mutate, ensure_can_view, mentorship_scope, Action};
use launchpad_core::error::CoreError;
use launchpad_core::mentorship::{plan_assignment, plan_update, MentorshipUpdate, UserRef};
use launchpad_core::status::MentorshipStatus;
use launchpad_core::types::DbId;
use launchpad_db::models::mentorship::{
    CreateMentorship, Mentorship, MentorshipResponse, MentorshipWithOwner, UpdateMentorship,
};
use launchpad_db::repositories::{MentorshipRepo, UserRepo};
use launchpad_events::{EventKind, PlatformEvent};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::product::load_product;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /mentorships`.
#[derive(Debug, Deserialize)]
pub struct AssignMentorRequest {
    pub product_id: DbId,
    pub mentor_id: DbId,
    pub notes: Option<String>,
}

/// Request body for `PUT /mentorships/{id}`. Omitted fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateMentorshipRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Admin-only: hand the mentorship to another mentor.
    pub mentor_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_mentorship(state: &AppState, id: DbId) -> AppResult<MentorshipWithOwner> {
    MentorshipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mentorship",
            id,
        }))
}

/// Resolve a prospective mentor. An unknown id reads the same as a
/// non-mentor user.
async fn load_mentor(state: &AppState, id: DbId) -> AppResult<UserRef> {
    match UserRepo::find_by_id(&state.pool, id).await? {
        Some(user) => Ok(user.user_ref()?),
        None => Err(AppError::Core(CoreError::Validation(format!(
            "User {id} is not a mentor"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/mentorships?status=
///
/// Admins see all, mentors their own, entrepreneurs those on their products.
pub async fn list_mentorships(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(params): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<MentorshipResponse>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<MentorshipStatus>)
        .transpose()?;

    let mentorships =
        MentorshipRepo::list(&state.pool, mentorship_scope(&auth.actor()), status).await?;
    let data = mentorships
        .into_iter()
        .map(Mentorship::into_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/mentorships
///
/// Assign a mentor to a product that has no mentorship yet.
pub async fn assign_mentor(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<AssignMentorRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MentorshipResponse>>)> {
    let product = load_product(&state, input.product_id).await?;
    let mentor = load_mentor(&state, input.mentor_id).await?;
    let existing = MentorshipRepo::find_by_product(&state.pool, product.id).await?;

    plan_assignment(
        &admin.actor(),
        &product.state()?,
        &mentor,
        input.notes.as_deref(),
        existing.map(|m| m.id),
    )?;

    // Concurrent assignments race on uq_mentorships_product_id (409).
    let mentorship = MentorshipRepo::create(
        &state.pool,
        &CreateMentorship {
            mentor_id: mentor.id,
            product_id: product.id,
            notes: input.notes,
        },
    )
    .await?;

    tracing::info!(
        mentorship_id = mentorship.id,
        product_id = product.id,
        mentor_id = mentor.id,
        admin_id = admin.user_id,
        "Mentor assigned"
    );
    state.event_bus.publish(
        PlatformEvent::new(EventKind::MentorshipAssigned, mentorship.id)
            .with_actor(admin.user_id)
            .with_payload(json!({ "product_id": product.id, "mentor_id": mentor.id })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: mentorship.into_response()?,
        }),
    ))
}

/// GET /api/v1/mentorships/{id}
pub async fn get_mentorship(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MentorshipResponse>>> {
    let row = load_mentorship(&state, id).await?;
    ensure_can_view(&auth.actor(), &row.state()?.resource())?;
    Ok(Json(DataResponse {
        data: row.mentorship.into_response()?,
    }))
}

/// PUT /api/v1/mentorships/{id}
///
/// The assigned mentor may change status and notes; admins may also reassign
/// the mentor.
pub async fn update_mentorship(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMentorshipRequest>,
) -> AppResult<Json<DataResponse<MentorshipResponse>>> {
    let actor = auth.actor();
    let row = load_mentorship(&state, id).await?;
    let snapshot = row.state()?;
    let resource = snapshot.resource();

    // Permission comes before resolving any referenced mentor.
    ensure_can_mutate(&actor, &resource, Action::UpdateMentorship)?;
    let mentor = match input.mentor_id {
        Some(mentor_id) => {
            ensure_can_mutate(&actor, &resource, Action::ReassignMentor)?;
            Some(load_mentor(&state, mentor_id).await?)
        }
        None => None,
    };
    let status = input
        .status
        .as_deref()
        .map(str::parse::<MentorshipStatus>)
        .transpose()?;

    let change = plan_update(
        &actor,
        &snapshot,
        MentorshipUpdate {
            status,
            notes: input.notes,
            mentor,
        },
    )?;
    if change.is_empty() {
        return Ok(Json(DataResponse {
            data: row.mentorship.into_response()?,
        }));
    }

    let update = UpdateMentorship {
        mentor_id: change.mentor_id,
        status: change.status,
        notes: change.notes,
    };
    let updated = MentorshipRepo::update(&state.pool, id, snapshot.status, &update)
        .await?
        .ok_or_else(|| AppError::stale("Mentorship", id))?;

    tracing::info!(
        mentorship_id = id,
        user_id = auth.user_id,
        status = ?update.status,
        mentor_id = ?update.mentor_id,
        "Mentorship updated"
    );
    state.event_bus.publish(
        PlatformEvent::new(EventKind::MentorshipUpdated, id)
            .with_actor(auth.user_id)
            .with_payload(json!({
                "from": snapshot.status,
                "to": update.status,
                "mentor_id": update.mentor_id,
                "notes_changed": update.notes.is_some(),
            })),
    );

    Ok(Json(DataResponse {
        data: updated.into_response()?,
    }))
}
