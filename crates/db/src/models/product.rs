//! Product entity model and DTOs.

use launchpad_core::dashboard::ProductFacts;
use launchpad_core::error::CoreError;
use launchpad_core::product::{ProductState, ProductSubmission};
use launchpad_core::status::{product_status, ProductStatus};
use launchpad_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub pitch_deck_url: Option<String>,
    pub images: Vec<String>,
    pub category: String,
    pub status_id: StatusId,
    pub funding_amount: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub fn status(&self) -> Result<ProductStatus, CoreError> {
        product_status(self.status_id)
    }

    /// Snapshot used by the transition and access rules.
    pub fn state(&self) -> Result<ProductState, CoreError> {
        Ok(ProductState {
            id: self.id,
            owner_id: self.owner_id,
            status: self.status()?,
            funding_amount: self.funding_amount,
        })
    }

    pub fn facts(&self) -> Result<ProductFacts, CoreError> {
        Ok(ProductFacts {
            status: self.status()?,
            funding_amount: self.funding_amount,
        })
    }

    pub fn into_response(self) -> Result<ProductResponse, CoreError> {
        let status = self.status()?;
        Ok(ProductResponse {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            pitch_deck_url: self.pitch_deck_url,
            images: self.images,
            category: self.category,
            status,
            funding_amount: self.funding_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Product representation for API responses, with the status as a label.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub pitch_deck_url: Option<String>,
    pub images: Vec<String>,
    pub category: String,
    pub status: ProductStatus,
    pub funding_amount: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a product. New products always start as pending.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub pitch_deck_url: Option<String>,
    pub images: Vec<String>,
    pub category: String,
}

impl CreateProduct {
    /// Trims free-text fields; the submission must already be validated.
    pub fn from_submission(owner_id: DbId, input: ProductSubmission) -> Self {
        Self {
            owner_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            video_url: input.video_url.trim().to_string(),
            pitch_deck_url: input.pitch_deck_url.map(|u| u.trim().to_string()),
            images: input.images,
            category: input.category.trim().to_string(),
        }
    }
}

/// Filters for listing products. `None` means unfiltered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub owner_id: Option<DbId>,
    pub status: Option<ProductStatus>,
}
