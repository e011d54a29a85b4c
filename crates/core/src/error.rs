//! The rule layer's error taxonomy.
//!
//! The HTTP layer maps each variant to one status code; see
//! `launchpad_api::error`.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Unknown id, or a resource the actor may not see (404).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or out-of-range input (400).
    #[error("invalid input: {0}")]
    Validation(String),

    /// Illegal transition, duplicate, or lost compare-and-set race (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// No identity, or one that could not be verified (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Identity is known but its role or ownership does not allow this (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Corrupt state, such as a status id with no matching enum variant (500).
    #[error("internal: {0}")]
    Internal(String),
}
