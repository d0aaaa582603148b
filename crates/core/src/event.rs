//! Append-only deposition activity timeline.
//!
//! Every state-machine transition and participant action appends one
//! [`DepositionEvent`]; entries are never mutated after creation. The
//! same struct doubles as the envelope published on the event bus for
//! notification consumers.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Scheduled,
    Rescheduled,
    AdmissionRequested,
    AdmissionGranted,
    AdmissionDenied,
    ParticipantJoined,
    ParticipantRoleChanged,
    OnRecord,
    OffRecord,
    Completed,
    Canceled,
    CancelReverted,
    BreakRoomCreated,
    BreakRoomLocked,
    BreakRoomUnlocked,
    BreakRoomJoined,
    BreakRoomLeft,
}

impl EventKind {
    /// Stable string form used in the `deposition_events.kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Scheduled => "scheduled",
            EventKind::Rescheduled => "rescheduled",
            EventKind::AdmissionRequested => "admission_requested",
            EventKind::AdmissionGranted => "admission_granted",
            EventKind::AdmissionDenied => "admission_denied",
            EventKind::ParticipantJoined => "participant_joined",
            EventKind::ParticipantRoleChanged => "participant_role_changed",
            EventKind::OnRecord => "on_record",
            EventKind::OffRecord => "off_record",
            EventKind::Completed => "completed",
            EventKind::Canceled => "canceled",
            EventKind::CancelReverted => "cancel_reverted",
            EventKind::BreakRoomCreated => "break_room_created",
            EventKind::BreakRoomLocked => "break_room_locked",
            EventKind::BreakRoomUnlocked => "break_room_unlocked",
            EventKind::BreakRoomJoined => "break_room_joined",
            EventKind::BreakRoomLeft => "break_room_left",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(EventKind::Scheduled),
            "rescheduled" => Some(EventKind::Rescheduled),
            "admission_requested" => Some(EventKind::AdmissionRequested),
            "admission_granted" => Some(EventKind::AdmissionGranted),
            "admission_denied" => Some(EventKind::AdmissionDenied),
            "participant_joined" => Some(EventKind::ParticipantJoined),
            "participant_role_changed" => Some(EventKind::ParticipantRoleChanged),
            "on_record" => Some(EventKind::OnRecord),
            "off_record" => Some(EventKind::OffRecord),
            "completed" => Some(EventKind::Completed),
            "canceled" => Some(EventKind::Canceled),
            "cancel_reverted" => Some(EventKind::CancelReverted),
            "break_room_created" => Some(EventKind::BreakRoomCreated),
            "break_room_locked" => Some(EventKind::BreakRoomLocked),
            "break_room_unlocked" => Some(EventKind::BreakRoomUnlocked),
            "break_room_joined" => Some(EventKind::BreakRoomJoined),
            "break_room_left" => Some(EventKind::BreakRoomLeft),
            _ => None,
        }
    }
}

/// One timeline entry: who did what, when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositionEvent {
    pub id: DbId,
    pub deposition_id: DbId,
    pub kind: EventKind,
    /// Acting user, when the actor was authenticated.
    pub actor_user_id: Option<DbId>,
    /// Free-text detail for display ("Witness admitted by ...").
    pub detail: Option<String>,
    pub created_at: Timestamp,
}

/// Fields for appending a new timeline entry.
#[derive(Debug, Clone)]
pub struct NewDepositionEvent {
    pub deposition_id: DbId,
    pub kind: EventKind,
    pub actor_user_id: Option<DbId>,
    pub detail: Option<String>,
}
