//! Participants and the admission tri-state.

use serde::{Deserialize, Serialize};

use crate::catalog::Role;
use crate::types::{DbId, Timestamp};

/// Waiting-room admission state of one participant.
///
/// Explicit tri-state: `Pending` means "not yet decided", never a null.
/// Terminal once decided for the current connection; a reconnect
/// re-enters `Pending` unless the participant was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Pending,
    Admitted,
    Denied,
}

impl AdmissionStatus {
    /// Stable string form used in the `participants.admission` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Pending => "pending",
            AdmissionStatus::Admitted => "admitted",
            AdmissionStatus::Denied => "denied",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AdmissionStatus::Pending),
            "admitted" => Some(AdmissionStatus::Admitted),
            "denied" => Some(AdmissionStatus::Denied),
            _ => None,
        }
    }
}

/// A person attached to one deposition.
///
/// Distinct from a platform user account: `user_id` is `None` for
/// unauthenticated guests joining through an invitation link.
#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub id: DbId,
    pub deposition_id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub admission: AdmissionStatus,
    pub has_joined: bool,
    pub muted: bool,
    pub device_info: Option<String>,
    pub created_at: Timestamp,
}

/// Fields needed to insert a new participant.
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub deposition_id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

/// Participant entry in a schedule request, before the deposition exists.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantSpec {
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_round_trips() {
        for state in [
            AdmissionStatus::Pending,
            AdmissionStatus::Admitted,
            AdmissionStatus::Denied,
        ] {
            assert_eq!(AdmissionStatus::parse(state.as_str()), Some(state));
        }
        assert_eq!(AdmissionStatus::parse("waiting"), None);
    }
}
