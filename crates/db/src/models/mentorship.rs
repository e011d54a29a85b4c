//! Mentorship entity model and DTOs.

use launchpad_core::error::CoreError;
use launchpad_core::mentorship::MentorshipState;
use launchpad_core::status::{mentorship_status, MentorshipStatus};
use launchpad_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `mentorships` table.
#[derive(Debug, Clone, FromRow)]
pub struct Mentorship {
    pub id: DbId,
    pub mentor_id: DbId,
    pub product_id: DbId,
    pub status_id: StatusId,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Mentorship {
    pub fn status(&self) -> Result<MentorshipStatus, CoreError> {
        mentorship_status(self.status_id)
    }

    pub fn into_response(self) -> Result<MentorshipResponse, CoreError> {
        let status = self.status()?;
        Ok(MentorshipResponse {
            id: self.id,
            mentor_id: self.mentor_id,
            product_id: self.product_id,
            status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A mentorship joined with the owner of its product.
///
/// The access rules need the product owner, which lives on `products`.
#[derive(Debug, Clone, FromRow)]
pub struct MentorshipWithOwner {
    #[sqlx(flatten)]
    pub mentorship: Mentorship,
    pub product_owner_id: DbId,
}

impl MentorshipWithOwner {
    pub fn state(&self) -> Result<MentorshipState, CoreError> {
        Ok(MentorshipState {
            id: self.mentorship.id,
            mentor_id: self.mentorship.mentor_id,
            product_owner_id: self.product_owner_id,
            status: self.mentorship.status()?,
        })
    }
}

/// Mentorship representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct MentorshipResponse {
    pub id: DbId,
    pub mentor_id: DbId,
    pub product_id: DbId,
    pub status: MentorshipStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a mentorship. New mentorships always start as active.
#[derive(Debug, Clone)]
pub struct CreateMentorship {
    pub mentor_id: DbId,
    pub product_id: DbId,
    pub notes: Option<String>,
}

/// DTO for updating a mentorship. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateMentorship {
    pub mentor_id: Option<DbId>,
    pub status: Option<MentorshipStatus>,
    pub notes: Option<String>,
}
