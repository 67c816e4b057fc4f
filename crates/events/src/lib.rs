//! Inkwell domain events.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the untyped envelope carried on the bus and stored
//!   in the `events` table.
//! - [`DomainEvent`] -- the typed events the workflow layer emits.
//! - [`EventPersistence`] -- background task that writes every event to the
//!   database.

pub mod bus;
pub mod domain;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use domain::DomainEvent;
pub use persistence::EventPersistence;
