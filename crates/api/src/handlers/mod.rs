pub mod admission;
pub mod break_rooms;
pub mod depositions;
pub mod permissions;
