//! Fan-out of [`PlatformEvent`]s over a `tokio::sync::broadcast` channel.

use tokio::sync::broadcast;

use crate::event::PlatformEvent;

/// Shared as `Arc<EventBus>` between the handlers and the persistence task.
///
/// A full buffer drops the oldest events; a slow receiver then sees
/// `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    /// Hand `event` to every live receiver. Returns how many got it, zero
    /// when nobody is listening.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        let kind = event.kind;
        let entity_id = event.source_entity_id;
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(event_type = %kind, entity_id, receivers, "Event published");
                receivers
            }
            Err(_) => {
                tracing::debug!(event_type = %kind, entity_id, "Event dropped, no receivers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    #[tokio::test]
    async fn every_subscriber_gets_a_copy() {
        let bus = EventBus::default();
        let mut admin_feed = bus.subscribe();
        let mut audit = bus.subscribe();

        let delivered = bus.publish(
            PlatformEvent::new(EventKind::ProductStatusChanged, 42)
                .with_actor(7)
                .with_payload(serde_json::json!({ "from": "pending", "to": "approved" })),
        );
        assert_eq!(delivered, 2);

        for rx in [&mut admin_feed, &mut audit] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.kind, EventKind::ProductStatusChanged);
            assert_eq!(event.source_entity_id, 42);
            assert_eq!(event.actor_user_id, Some(7));
            assert_eq!(event.payload["to"], "approved");
        }
    }

    #[test]
    fn publishing_without_receivers_is_a_no_op() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(PlatformEvent::new(EventKind::ProductSubmitted, 1)), 0);
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::new(4);
        let _early = bus.subscribe();
        bus.publish(PlatformEvent::new(EventKind::ProductSubmitted, 1));

        let mut late = bus.subscribe();
        bus.publish(PlatformEvent::new(EventKind::ProductUpdated, 1));
        assert_eq!(late.recv().await.unwrap().kind, EventKind::ProductUpdated);
    }
}
