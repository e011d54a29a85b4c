//! Rows of the append-only `events` table behind the activity feed.

use launchpad_core::types::{DbId, Timestamp};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

/// One feed entry, serialized as-is in `GET /dashboard/activity`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    /// `<entity>.<verb>`, e.g. `product.status_changed`.
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: Value,
    pub created_at: Timestamp,
}

/// Borrowed insert payload; `created_at` is set by the database.
#[derive(Debug, Clone)]
pub struct CreateEvent<'a> {
    pub event_type: &'a str,
    pub source_entity_type: Option<&'a str>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: &'a Value,
}
