//! Product submission validation and status transitions.
//!
//! Transition table:
//!
//! ```text
//! pending  -> approved | rejected
//! approved -> funded
//! rejected, funded: terminal
//! ```
//!
//! Writing the current status again is always a no-op. Who may request a
//! change is decided by [`access::can_mutate`](crate::access::can_mutate).

use serde::Deserialize;
use validator::{Validate, ValidateUrl};

use crate::access::{ensure_can_mutate, Action, Resource};
use crate::error::CoreError;
use crate::roles::{Actor, Role};
use crate::status::ProductStatus;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const MAX_TITLE_LENGTH: u64 = 200;
pub const MAX_CATEGORY_LENGTH: u64 = 100;
pub const MAX_DESCRIPTION_LENGTH: u64 = 10_000;
pub const MAX_IMAGES: u64 = 10;

/* --------------------------------------------------------------------------
Submission
-------------------------------------------------------------------------- */

/// Fields an entrepreneur supplies when submitting (or editing) a product.
///
/// Missing JSON fields deserialize to empty values so that they surface as
/// validation errors instead of body-parsing failures.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProductSubmission {
    #[validate(length(max = MAX_TITLE_LENGTH))]
    pub title: String,
    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: String,
    #[validate(url)]
    pub video_url: String,
    #[validate(url)]
    pub pitch_deck_url: Option<String>,
    #[validate(length(max = MAX_IMAGES))]
    pub images: Vec<String>,
    #[validate(length(max = MAX_CATEGORY_LENGTH))]
    pub category: String,
}

/// Validate a submission: required fields present, URLs well-formed, limits respected.
pub fn validate_submission(input: &ProductSubmission) -> Result<(), CoreError> {
    let required = [
        ("title", &input.title),
        ("description", &input.description),
        ("video_url", &input.video_url),
        ("category", &input.category),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!("{field} is required")));
        }
    }

    if let Some(bad) = input.images.iter().find(|url| !url.validate_url()) {
        return Err(CoreError::Validation(format!(
            "images contains an invalid URL: {bad:?}"
        )));
    }

    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

/// Only entrepreneurs submit products; the submitter becomes the owner.
pub fn ensure_can_submit(actor: &Actor) -> Result<(), CoreError> {
    if actor.role == Role::Entrepreneur {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role {} cannot submit products",
            actor.role
        )))
    }
}

/* --------------------------------------------------------------------------
Status transitions
-------------------------------------------------------------------------- */

impl ProductStatus {
    /// Statuses reachable in one step from `self`, excluding `self`.
    pub fn next_statuses(self) -> &'static [ProductStatus] {
        match self {
            ProductStatus::Pending => &[ProductStatus::Approved, ProductStatus::Rejected],
            ProductStatus::Approved => &[ProductStatus::Funded],
            ProductStatus::Rejected | ProductStatus::Funded => &[],
        }
    }

    pub fn can_transition_to(self, next: ProductStatus) -> bool {
        self == next || self.next_statuses().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }
}

/// Snapshot of the product fields the status rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductState {
    pub id: DbId,
    pub owner_id: DbId,
    pub status: ProductStatus,
    /// Set exactly when `status` is funded.
    pub funding_amount: Option<i64>,
}

impl ProductState {
    pub fn resource(&self) -> Resource {
        Resource::Product {
            id: self.id,
            owner_id: self.owner_id,
            status: self.status,
        }
    }
}

/// What a requested status change resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The product already has the requested status; nothing to write.
    Unchanged,
    /// Persist the new status (conditional on `from` still being current).
    Transition {
        from: ProductStatus,
        to: ProductStatus,
        funding_amount: Option<i64>,
    },
}

/// Decide whether `actor` may move `product` to `to`.
///
/// Checks, in order: permission, funding amount, transition legality.
pub fn plan_status_change(
    actor: &Actor,
    product: &ProductState,
    to: ProductStatus,
    funding_amount: Option<i64>,
) -> Result<StatusChange, CoreError> {
    ensure_can_mutate(actor, &product.resource(), Action::ChangeProductStatus(to))?;

    match (to, funding_amount) {
        (ProductStatus::Funded, None) => {
            return Err(CoreError::Validation(
                "funding_amount is required when funding a product".to_string(),
            ));
        }
        (ProductStatus::Funded, Some(amount)) if amount <= 0 => {
            return Err(CoreError::Validation(
                "funding_amount must be greater than zero".to_string(),
            ));
        }
        (status, Some(_)) if status != ProductStatus::Funded => {
            return Err(CoreError::Validation(format!(
                "funding_amount is only allowed when status is {}",
                ProductStatus::Funded
            )));
        }
        _ => {}
    }

    if product.status == to {
        // The funded amount is fixed once set.
        if funding_amount != product.funding_amount {
            return Err(CoreError::Conflict(format!(
                "Product {} is already funded with {}",
                product.id,
                product.funding_amount.unwrap_or_default()
            )));
        }
        return Ok(StatusChange::Unchanged);
    }

    if !product.status.can_transition_to(to) {
        return Err(CoreError::Conflict(format!(
            "Product {} cannot move from {} to {}",
            product.id, product.status, to
        )));
    }

    Ok(StatusChange::Transition {
        from: product.status,
        to,
        funding_amount,
    })
}

/// Decide whether `actor` may edit the details of `product`.
pub fn ensure_can_edit(actor: &Actor, product: &ProductState) -> Result<(), CoreError> {
    ensure_can_mutate(actor, &product.resource(), Action::EditProduct)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
