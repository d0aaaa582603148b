//! Row models for the session tables.
//!
//! Each submodule contains a `FromRow` struct matching the database row
//! and an `into_core` conversion to the engine's domain type. Enum
//! columns are stored as their stable string forms; a row carrying an
//! unknown value converts to `CoreError::Internal` rather than
//! panicking.

pub mod break_room;
pub mod deposition;
pub mod event;
pub mod participant;
pub mod role_assignment;

pub use break_room::BreakRoomRow;
pub use deposition::DepositionRow;
pub use event::DepositionEventRow;
pub use participant::ParticipantRow;
pub use role_assignment::RoleAssignmentRow;
