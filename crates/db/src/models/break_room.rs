//! Break room row model.

use depo_core::breakout::BreakRoom;
use depo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `break_rooms` table. Membership lives in
/// `break_room_members` and is attached by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct BreakRoomRow {
    pub id: DbId,
    pub deposition_id: DbId,
    pub room_ref: String,
    pub name: String,
    pub locked: bool,
    pub created_at: Timestamp,
}

impl BreakRoomRow {
    pub fn into_core(self, members: Vec<DbId>) -> BreakRoom {
        BreakRoom {
            id: self.id,
            deposition_id: self.deposition_id,
            room_ref: self.room_ref,
            name: self.name,
            locked: self.locked,
            members,
            created_at: self.created_at,
        }
    }
}
