//! Launchpad domain events.
//!
//! Handlers publish a [`PlatformEvent`] on the [`EventBus`] once a write has
//! committed. [`EventPersistence`] drains the bus into the `events` table,
//! which backs the admin activity feed.

pub mod bus;
pub mod event;
pub mod persistence;

pub use bus::EventBus;
pub use event::{EventKind, PlatformEvent};
pub use persistence::EventPersistence;
