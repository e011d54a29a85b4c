//! Copies every bus event into the `events` table.

use launchpad_core::types::DbId;
use launchpad_db::models::event::CreateEvent;
use launchpad_db::repositories::EventRepo;
use launchpad_db::DbPool;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::event::PlatformEvent;

pub struct EventPersistence;

impl EventPersistence {
    /// Long-running task spawned from `main`. Returns once every sender is
    /// gone. Insert failures and lag are logged, never fatal.
    pub async fn run(pool: DbPool, mut receiver: Receiver<PlatformEvent>) {
        let mut stored: u64 = 0;
        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Activity log fell behind the bus, events lost");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match Self::persist(&pool, &event).await {
                Ok(_) => stored += 1,
                Err(e) => tracing::error!(
                    error = %e,
                    event_type = %event.kind,
                    entity_id = event.source_entity_id,
                    "Could not store event"
                ),
            }
        }
        tracing::info!(stored, "Event bus closed, activity log writer stopped");
    }

    /// Insert one event and return its row id.
    pub async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        let row = CreateEvent {
            event_type: event.kind.as_str(),
            source_entity_type: Some(event.kind.entity()),
            source_entity_id: Some(event.source_entity_id),
            actor_user_id: event.actor_user_id,
            payload: &event.payload,
        };
        EventRepo::insert(pool, &row).await
    }
}
