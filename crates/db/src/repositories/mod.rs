//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod break_room_repo;
pub mod deposition_repo;
pub mod event_repo;
pub mod participant_repo;
pub mod role_assignment_repo;

pub use break_room_repo::BreakRoomRepo;
pub use deposition_repo::DepositionRepo;
pub use event_repo::EventRepo;
pub use participant_repo::ParticipantRepo;
pub use role_assignment_repo::RoleAssignmentRepo;
