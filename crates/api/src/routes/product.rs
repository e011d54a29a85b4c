//! Route definitions for the `/products` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET  /              -> list_products
/// POST /              -> create_product
/// GET  /{id}          -> get_product
/// PUT  /{id}          -> update_product
/// PUT  /{id}/status   -> change_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list_products).post(product::create_product))
        .route(
            "/{id}",
            get(product::get_product).put(product::update_product),
        )
        .route("/{id}/status", put(product::change_status))
}
