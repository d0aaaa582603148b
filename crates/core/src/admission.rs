//! Waiting-room admission policy.
//!
//! Which roles bypass the waiting room is deployment configuration, not
//! business logic: the default below auto-admits the administrative
//! roles and the court reporter, and the deposition's own requester is
//! always exempt. Everyone else is held `Pending` until an authorized
//! admitter decides.

use std::collections::HashSet;

use crate::catalog::Role;
use crate::deposition::Deposition;
use crate::participant::Participant;

/// Configurable waiting-room exemption rules.
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    /// Participant roles seated immediately, bypassing the pending queue.
    pub auto_admit_roles: HashSet<Role>,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            auto_admit_roles: [Role::CaseAdmin, Role::DepositionAdmin, Role::CourtReporter]
                .into_iter()
                .collect(),
        }
    }
}

impl AdmissionPolicy {
    /// Whether a joining participant bypasses the waiting room.
    ///
    /// Exempt: roles in the auto-admit set, and the deposition's
    /// requester joining as a participant.
    pub fn is_exempt(&self, deposition: &Deposition, participant: &Participant) -> bool {
        if self.auto_admit_roles.contains(&participant.role) {
            return true;
        }
        match participant.user_id {
            Some(user_id) => user_id == deposition.requester_id,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposition::DepositionStatus;
    use crate::participant::AdmissionStatus;
    use crate::types::DbId;

    fn deposition(requester_id: DbId) -> Deposition {
        let now = chrono::Utc::now();
        Deposition {
            id: 1,
            case_id: 1,
            requester_id,
            added_by_id: requester_id,
            room_ref: None,
            waiting_room_ref: None,
            shared_document_id: None,
            status: DepositionStatus::Scheduled,
            on_the_record: false,
            scheduled_start: now,
            scheduled_end: None,
            complete_date: None,
            details: None,
            video_recording_required: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn participant(user_id: Option<DbId>, role: Role) -> Participant {
        Participant {
            id: 10,
            deposition_id: 1,
            user_id,
            name: "p".into(),
            email: None,
            role,
            admission: AdmissionStatus::Pending,
            has_joined: false,
            muted: false,
            device_info: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn court_reporter_is_exempt_by_default() {
        let policy = AdmissionPolicy::default();
        assert!(policy.is_exempt(&deposition(5), &participant(Some(7), Role::CourtReporter)));
    }

    #[test]
    fn witness_is_not_exempt() {
        let policy = AdmissionPolicy::default();
        assert!(!policy.is_exempt(&deposition(5), &participant(Some(7), Role::Witness)));
    }

    #[test]
    fn requester_is_exempt_regardless_of_role() {
        let policy = AdmissionPolicy::default();
        assert!(policy.is_exempt(&deposition(7), &participant(Some(7), Role::Observer)));
    }

    #[test]
    fn guest_witness_is_not_exempt() {
        let policy = AdmissionPolicy::default();
        assert!(!policy.is_exempt(&deposition(5), &participant(None, Role::Witness)));
    }

    #[test]
    fn policy_is_configuration() {
        let policy = AdmissionPolicy {
            auto_admit_roles: [Role::TechExpert].into_iter().collect(),
        };
        assert!(policy.is_exempt(&deposition(5), &participant(Some(7), Role::TechExpert)));
        assert!(!policy.is_exempt(&deposition(5), &participant(Some(7), Role::CourtReporter)));
    }
}
