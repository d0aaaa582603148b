//! Deposition event bus.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`spawn_event_logger`] — background subscriber that writes every
//!   published event to the structured log.
//!
//! The bus implements the engine's `EventSink` trait, so the session
//! orchestrator can fan events out to any number of subscribers
//! (websocket relays, notification workers) without knowing about them.

pub mod bus;

pub use bus::{spawn_event_logger, EventBus};
