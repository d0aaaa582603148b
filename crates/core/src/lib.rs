//! Deposition session engine.
//!
//! The permission-gated core of the platform: the deposition lifecycle
//! state machine, the resource-scoped role/permission engine, the
//! waiting-room admission gate, and the break-room manager, sequenced
//! by [`orchestrator::SessionOrchestrator`]. Persistence, video rooms,
//! and notification delivery are consumed as traits ([`store`]); this
//! crate owns decisions, not I/O.

pub mod action;
pub mod admission;
pub mod breakout;
pub mod catalog;
pub mod deposition;
pub mod error;
pub mod event;
pub mod memory;
pub mod orchestrator;
pub mod participant;
pub mod permission;
pub mod store;
pub mod types;

pub use action::{Action, ResourceType};
pub use catalog::{PermissionCatalog, Role};
pub use deposition::{Deposition, DepositionStatus};
pub use error::{CoreError, CoreResult};
pub use event::{DepositionEvent, EventKind};
pub use orchestrator::{JoinOutcome, ScheduleRequest, SessionOrchestrator};
pub use participant::{AdmissionStatus, Participant};
pub use permission::{Actor, PermissionEngine};
pub use store::{EventSink, RoleAssignment, RoomProvider, SessionStore};
