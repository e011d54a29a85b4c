//! Repository for the `products` table.

use launchpad_core::status::ProductStatus;
use launchpad_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product, ProductFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, description, video_url, pitch_deck_url, images, \
                        category, status_id, funding_amount, created_at, updated_at";

/// Provides CRUD operations for products.
///
/// Writes that depend on the current status take the status the caller
/// observed and only apply while it still holds. A `None` result from those
/// methods means the row is gone or was changed concurrently.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product in the `pending` status.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (owner_id, title, description, video_url, pitch_deck_url, images, category, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.video_url)
            .bind(&input.pitch_deck_url)
            .bind(&input.images)
            .bind(&input.category)
            .bind(ProductStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List products, most recently updated first.
    pub async fn list(pool: &PgPool, filter: ProductFilter) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1::BIGINT IS NULL OR owner_id = $1)
               AND ($2::SMALLINT IS NULL OR status_id = $2)
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(filter.owner_id)
            .bind(filter.status.map(ProductStatus::id))
            .fetch_all(pool)
            .await
    }

    /// Replace the editable details of a product while its status is still
    /// `expected`.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        expected: ProductStatus,
        input: &CreateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                title = $3,
                description = $4,
                video_url = $5,
                pitch_deck_url = $6,
                images = $7,
                category = $8
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(expected.id())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.video_url)
            .bind(&input.pitch_deck_url)
            .bind(&input.images)
            .bind(&input.category)
            .fetch_optional(pool)
            .await
    }

    /// Move a product from `from` to `to`, recording `funding_amount`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: ProductStatus,
        to: ProductStatus,
        funding_amount: Option<i64>,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET status_id = $3, funding_amount = $4
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(from.id())
            .bind(to.id())
            .bind(funding_amount)
            .fetch_optional(pool)
            .await
    }

    /// Status and funding of every product in scope, for dashboard counts.
    pub async fn list_facts(
        pool: &PgPool,
        owner_id: Option<DbId>,
    ) -> Result<Vec<(StatusId, Option<i64>)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT status_id, funding_amount FROM products
             WHERE ($1::BIGINT IS NULL OR owner_id = $1)",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }
}

