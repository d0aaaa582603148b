//! Deposition entity and lifecycle state machine.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DbId, Timestamp};

/// Lifecycle status of a deposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositionStatus {
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

impl DepositionStatus {
    /// Stable string form used in the `depositions.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositionStatus::Scheduled => "scheduled",
            DepositionStatus::InProgress => "in_progress",
            DepositionStatus::Completed => "completed",
            DepositionStatus::Canceled => "canceled",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(DepositionStatus::Scheduled),
            "in_progress" => Some(DepositionStatus::InProgress),
            "completed" => Some(DepositionStatus::Completed),
            "canceled" => Some(DepositionStatus::Canceled),
            _ => None,
        }
    }

    /// A deposition is live while participants can join and act in it.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            DepositionStatus::Scheduled | DepositionStatus::InProgress
        )
    }
}

/// Returns the set of valid target statuses reachable from `from`.
///
/// `Completed` is terminal. `Canceled` can only be reverted back to
/// `Scheduled`.
pub fn valid_transitions(from: DepositionStatus) -> &'static [DepositionStatus] {
    match from {
        DepositionStatus::Scheduled => &[
            DepositionStatus::InProgress,
            DepositionStatus::Completed,
            DepositionStatus::Canceled,
        ],
        DepositionStatus::InProgress => {
            &[DepositionStatus::Completed, DepositionStatus::Canceled]
        }
        DepositionStatus::Canceled => &[DepositionStatus::Scheduled],
        DepositionStatus::Completed => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: DepositionStatus, to: DepositionStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a state transition, returning `InvalidState` for illegal ones.
pub fn validate_transition(from: DepositionStatus, to: DepositionStatus) -> CoreResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "Invalid transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// The central aggregate: one scheduled testimony session.
///
/// Never hard-deleted; cancellation is a status. Immutable once
/// `Completed` except for the transitions modeled above.
#[derive(Debug, Clone, Serialize)]
pub struct Deposition {
    pub id: DbId,
    pub case_id: DbId,
    pub requester_id: DbId,
    pub added_by_id: DbId,
    /// Opaque reference to the primary video room, once provisioned.
    pub room_ref: Option<String>,
    /// Opaque reference to the pre-session waiting room.
    pub waiting_room_ref: Option<String>,
    pub shared_document_id: Option<DbId>,
    pub status: DepositionStatus,
    pub on_the_record: bool,
    pub scheduled_start: Timestamp,
    pub scheduled_end: Option<Timestamp>,
    pub complete_date: Option<Timestamp>,
    pub details: Option<String>,
    pub video_recording_required: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Deposition {
    /// Guard for the on-the-record toggle: legal only while live.
    pub fn ensure_can_toggle_record(&self) -> CoreResult<()> {
        if self.status.is_live() {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "Cannot change the record state of a {} deposition",
                self.status.as_str()
            )))
        }
    }
}

/// Fields needed to insert a new deposition. Ids and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDeposition {
    pub case_id: DbId,
    pub requester_id: DbId,
    pub added_by_id: DbId,
    pub shared_document_id: Option<DbId>,
    pub scheduled_start: Timestamp,
    pub scheduled_end: Option<Timestamp>,
    pub details: Option<String>,
    pub video_recording_required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_to_in_progress() {
        assert!(can_transition(
            DepositionStatus::Scheduled,
            DepositionStatus::InProgress
        ));
    }

    #[test]
    fn scheduled_to_completed() {
        assert!(can_transition(
            DepositionStatus::Scheduled,
            DepositionStatus::Completed
        ));
    }

    #[test]
    fn scheduled_to_canceled() {
        assert!(can_transition(
            DepositionStatus::Scheduled,
            DepositionStatus::Canceled
        ));
    }

    #[test]
    fn in_progress_to_completed() {
        assert!(can_transition(
            DepositionStatus::InProgress,
            DepositionStatus::Completed
        ));
    }

    #[test]
    fn canceled_reverts_to_scheduled_only() {
        assert_eq!(
            valid_transitions(DepositionStatus::Canceled),
            &[DepositionStatus::Scheduled]
        );
    }

    #[test]
    fn completed_is_terminal() {
        assert!(valid_transitions(DepositionStatus::Completed).is_empty());
    }

    #[test]
    fn completed_to_canceled_is_invalid() {
        let err = validate_transition(DepositionStatus::Completed, DepositionStatus::Canceled)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[test]
    fn in_progress_back_to_scheduled_is_invalid() {
        assert!(!can_transition(
            DepositionStatus::InProgress,
            DepositionStatus::Scheduled
        ));
    }

    #[test]
    fn status_round_trips() {
        for status in [
            DepositionStatus::Scheduled,
            DepositionStatus::InProgress,
            DepositionStatus::Completed,
            DepositionStatus::Canceled,
        ] {
            assert_eq!(DepositionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DepositionStatus::parse("paused"), None);
    }

    #[test]
    fn live_statuses() {
        assert!(DepositionStatus::Scheduled.is_live());
        assert!(DepositionStatus::InProgress.is_live());
        assert!(!DepositionStatus::Completed.is_live());
        assert!(!DepositionStatus::Canceled.is_live());
    }
}
