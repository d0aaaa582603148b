//! Break rooms: lockable sub-sessions scoped to a live deposition.

use serde::Serialize;

use crate::deposition::{Deposition, DepositionStatus};
use crate::error::{CoreError, CoreResult};
use crate::types::{DbId, Timestamp};

/// A secondary room owned by one deposition.
///
/// Lifetime is bounded by the owning deposition: once the deposition is
/// no longer live every break room is unjoinable, whether or not the
/// row still exists.
#[derive(Debug, Clone, Serialize)]
pub struct BreakRoom {
    pub id: DbId,
    pub deposition_id: DbId,
    /// Opaque reference into the external room provider.
    pub room_ref: String,
    pub name: String,
    pub locked: bool,
    /// Member participant ids. Participant-keyed so unauthenticated
    /// guests can use break rooms too.
    pub members: Vec<DbId>,
    pub created_at: Timestamp,
}

impl BreakRoom {
    pub fn is_member(&self, participant_id: DbId) -> bool {
        self.members.contains(&participant_id)
    }

    /// Guard for joining: the room must be unlocked, unless the
    /// participant is already a member (locking never evicts).
    pub fn ensure_joinable_by(&self, participant_id: DbId) -> CoreResult<()> {
        if self.locked && !self.is_member(participant_id) {
            return Err(CoreError::Conflict(format!(
                "Break room '{}' is locked",
                self.name
            )));
        }
        Ok(())
    }
}

/// Fields needed to insert a new break room.
#[derive(Debug, Clone)]
pub struct NewBreakRoom {
    pub deposition_id: DbId,
    pub room_ref: String,
    pub name: String,
}

/// Guard shared by every break-room mutation: the owning deposition
/// must be in progress. Covers the cascade rule — after `Completed` or
/// `Canceled` all break-room operations fail with `InvalidState`.
pub fn ensure_deposition_live(deposition: &Deposition) -> CoreResult<()> {
    if deposition.status == DepositionStatus::InProgress {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "Break rooms are unavailable while the deposition is {}",
            deposition.status.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(locked: bool, members: Vec<DbId>) -> BreakRoom {
        BreakRoom {
            id: 1,
            deposition_id: 1,
            room_ref: "room-abc".into(),
            name: "Counsel".into(),
            locked,
            members,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn unlocked_room_is_joinable() {
        assert!(room(false, vec![]).ensure_joinable_by(9).is_ok());
    }

    #[test]
    fn locked_room_rejects_non_members() {
        let err = room(true, vec![]).ensure_joinable_by(9).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn locked_room_keeps_existing_members() {
        assert!(room(true, vec![9]).ensure_joinable_by(9).is_ok());
    }
}
