//! Handlers for the `/products` resource.
//!
//! Each lifecycle handler loads a snapshot, asks `launchpad_core` for a
//! decision, writes conditionally on the status it read, then publishes an
//! event.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use launchpad_core::access::{can_view, ensure_can_view, product_scope, Resource};
use launchpad_core::error::CoreError;
use launchpad_core::product::{
    ensure_can_edit, ensure_can_submit, plan_status_change, validate_submission,
    ProductSubmission, StatusChange,
};
use launchpad_core::status::ProductStatus;
use launchpad_core::types::DbId;
use launchpad_db::models::mentorship::MentorshipResponse;
use launchpad_db::models::product::{CreateProduct, Product, ProductFilter, ProductResponse};
use launchpad_db::repositories::{MentorshipRepo, ProductRepo};
use launchpad_events::{EventKind, PlatformEvent};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /products/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    pub funding_amount: Option<i64>,
}

/// A product together with its mentorship, when the caller may see it.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub mentorship: Option<MentorshipResponse>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn load_product(state: &AppState, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/products?status=
///
/// Admins and mentors see every product; entrepreneurs see their own.
pub async fn list_products(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(params): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<ProductResponse>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<ProductStatus>)
        .transpose()?;
    let filter = ProductFilter {
        owner_id: product_scope(&auth.actor()).owner_id(),
        status,
    };

    let products = ProductRepo::list(&state.pool, filter).await?;
    let data = products
        .into_iter()
        .map(Product::into_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/products
///
/// Submit a new product. It starts out pending and owned by the caller.
pub async fn create_product(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<ProductSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductResponse>>)> {
    ensure_can_submit(&auth.actor())?;
    validate_submission(&input)?;

    let product =
        ProductRepo::create(&state.pool, &CreateProduct::from_submission(auth.user_id, input))
            .await?;

    tracing::info!(
        product_id = product.id,
        owner_id = product.owner_id,
        "Product submitted"
    );
    state.event_bus.publish(
        PlatformEvent::new(EventKind::ProductSubmitted, product.id)
            .with_actor(auth.user_id)
            .with_payload(json!({ "title": product.title, "category": product.category })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: product.into_response()?,
        }),
    ))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductDetail>>> {
    let actor = auth.actor();
    let product = load_product(&state, id).await?;
    ensure_can_view(&actor, &product.state()?.resource())?;

    let mentorship = match MentorshipRepo::find_by_product(&state.pool, id).await? {
        Some(m) => {
            let resource = Resource::Mentorship {
                id: m.id,
                mentor_id: m.mentor_id,
                product_owner_id: product.owner_id,
            };
            match can_view(Some(&actor), &resource) {
                Ok(()) => Some(m.into_response()?),
                Err(_) => None,
            }
        }
        None => None,
    };

    Ok(Json(DataResponse {
        data: ProductDetail {
            product: product.into_response()?,
            mentorship,
        },
    }))
}

/// PUT /api/v1/products/{id}
///
/// Replace the product details. Owners may edit while pending; admins always.
pub async fn update_product(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<ProductSubmission>,
) -> AppResult<Json<DataResponse<ProductResponse>>> {
    let product = load_product(&state, id).await?;
    let snapshot = product.state()?;
    ensure_can_edit(&auth.actor(), &snapshot)?;
    validate_submission(&input)?;

    let details = CreateProduct::from_submission(product.owner_id, input);
    let updated = ProductRepo::update_details(&state.pool, id, snapshot.status, &details)
        .await?
        .ok_or_else(|| AppError::stale("Product", id))?;

    tracing::info!(product_id = id, user_id = auth.user_id, "Product updated");
    state.event_bus.publish(
        PlatformEvent::new(EventKind::ProductUpdated, id).with_actor(auth.user_id),
    );

    Ok(Json(DataResponse {
        data: updated.into_response()?,
    }))
}

/// PUT /api/v1/products/{id}/status
///
/// Move a product through its lifecycle. Admin-only, except that the owner
/// may re-send `pending` for a still-pending product as a no-op.
pub async fn change_status(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<DataResponse<ProductResponse>>> {
    let target: ProductStatus = input.status.parse()?;
    let product = load_product(&state, id).await?;

    let change = plan_status_change(&auth.actor(), &product.state()?, target, input.funding_amount)?;

    let (from, to, funding_amount) = match change {
        StatusChange::Unchanged => {
            return Ok(Json(DataResponse {
                data: product.into_response()?,
            }));
        }
        StatusChange::Transition {
            from,
            to,
            funding_amount,
        } => (from, to, funding_amount),
    };

    let updated = ProductRepo::set_status(&state.pool, id, from, to, funding_amount)
        .await?
        .ok_or_else(|| AppError::stale("Product", id))?;

    tracing::info!(
        product_id = id,
        user_id = auth.user_id,
        from = %from,
        to = %to,
        ?funding_amount,
        "Product status changed"
    );
    state.event_bus.publish(
        PlatformEvent::new(EventKind::ProductStatusChanged, id)
            .with_actor(auth.user_id)
            .with_payload(json!({
                "from": from,
                "to": to,
                "funding_amount": funding_amount,
            })),
    );

    Ok(Json(DataResponse {
        data: updated.into_response()?,
    }))
}
