//! The event envelope handlers publish after a committed write.

use chrono::{DateTime, Utc};
use launchpad_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened. The serialized name is `<entity>.<verb>`, which is also
/// what lands in `events.event_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "product.submitted")]
    ProductSubmitted,
    #[serde(rename = "product.updated")]
    ProductUpdated,
    #[serde(rename = "product.status_changed")]
    ProductStatusChanged,
    #[serde(rename = "mentorship.assigned")]
    MentorshipAssigned,
    #[serde(rename = "mentorship.updated")]
    MentorshipUpdated,
}

impl EventKind {
    pub const ALL: &'static [EventKind] = &[
        EventKind::ProductSubmitted,
        EventKind::ProductUpdated,
        EventKind::ProductStatusChanged,
        EventKind::MentorshipAssigned,
        EventKind::MentorshipUpdated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ProductSubmitted => "product.submitted",
            EventKind::ProductUpdated => "product.updated",
            EventKind::ProductStatusChanged => "product.status_changed",
            EventKind::MentorshipAssigned => "mentorship.assigned",
            EventKind::MentorshipUpdated => "mentorship.updated",
        }
    }

    /// The `<entity>` half of the name, stored as `source_entity_type`.
    pub fn entity(self) -> &'static str {
        let name = self.as_str();
        name.split_once('.').map_or(name, |(entity, _)| entity)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub kind: EventKind,
    /// The product or mentorship, depending on `kind`.
    pub source_entity_id: DbId,
    pub actor_user_id: Option<DbId>,
    /// Kind-specific detail such as `{"from": "pending", "to": "approved"}`.
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(kind: EventKind, source_entity_id: DbId) -> Self {
        Self {
            kind,
            source_entity_id,
            actor_user_id: None,
            payload: Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(self, user_id: DbId) -> Self {
        Self {
            actor_user_id: Some(user_id),
            ..self
        }
    }

    pub fn with_payload(self, payload: Value) -> Self {
        Self { payload, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_kind_is_the_stored_name() {
        for &kind in EventKind::ALL {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn entity_is_the_name_prefix() {
        assert_eq!(EventKind::ProductStatusChanged.entity(), "product");
        assert_eq!(EventKind::MentorshipAssigned.entity(), "mentorship");
    }

    #[test]
    fn builders_fill_actor_and_payload() {
        let event = PlatformEvent::new(EventKind::ProductUpdated, 3)
            .with_actor(11)
            .with_payload(serde_json::json!({ "title": "Solar kiosks" }));
        assert_eq!(event.actor_user_id, Some(11));
        assert_eq!(event.payload["title"], "Solar kiosks");

        let bare = PlatformEvent::new(EventKind::ProductUpdated, 3);
        assert_eq!(bare.actor_user_id, None);
        assert!(bare.payload.as_object().is_some_and(|m| m.is_empty()));
    }
}
