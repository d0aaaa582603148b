//! Roles and the static role → action catalog.
//!
//! The catalog is seeded once at startup and never mutated at runtime.
//! It is data, not behaviour: changing what a court reporter may do is a
//! change to [`PermissionCatalog::seed`], not to any call site.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// A resource-scoped role. Participants carry one of the session roles;
/// role assignments may additionally carry the administrative roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    CaseAdmin,
    DepositionAdmin,
    CourtReporter,
    Witness,
    Attendee,
    TechExpert,
    Observer,
    /// Restricted role every non-administrative attendee is demoted to
    /// when the deposition completes. View-only.
    CompletedAttendee,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::CaseAdmin,
        Role::DepositionAdmin,
        Role::CourtReporter,
        Role::Witness,
        Role::Attendee,
        Role::TechExpert,
        Role::Observer,
        Role::CompletedAttendee,
    ];

    /// Stable string form used in the database and in event detail text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CaseAdmin => "case_admin",
            Role::DepositionAdmin => "deposition_admin",
            Role::CourtReporter => "court_reporter",
            Role::Witness => "witness",
            Role::Attendee => "attendee",
            Role::TechExpert => "tech_expert",
            Role::Observer => "observer",
            Role::CompletedAttendee => "completed_attendee",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown roles.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "case_admin" => Some(Role::CaseAdmin),
            "deposition_admin" => Some(Role::DepositionAdmin),
            "court_reporter" => Some(Role::CourtReporter),
            "witness" => Some(Role::Witness),
            "attendee" => Some(Role::Attendee),
            "tech_expert" => Some(Role::TechExpert),
            "observer" => Some(Role::Observer),
            "completed_attendee" => Some(Role::CompletedAttendee),
            _ => None,
        }
    }

    /// Whether the role is demoted to [`Role::CompletedAttendee`] when
    /// the owning deposition completes. Administrative roles and the
    /// court reporter keep their grants for post-session review.
    pub fn demotes_on_completion(&self) -> bool {
        matches!(
            self,
            Role::Witness | Role::Attendee | Role::TechExpert | Role::Observer
        )
    }
}

/// Immutable role → action mapping, seeded at startup.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    actions: HashMap<Role, HashSet<Action>>,
}

impl PermissionCatalog {
    /// Build the seeded catalog.
    pub fn seed() -> Self {
        let mut actions: HashMap<Role, HashSet<Action>> = HashMap::new();

        let mut grant = |role: Role, granted: &[Action]| {
            actions.insert(role, granted.iter().copied().collect());
        };

        grant(Role::CaseAdmin, Action::ALL);
        grant(
            Role::DepositionAdmin,
            &[
                Action::View,
                Action::ViewDetails,
                Action::Update,
                Action::OnRecord,
                Action::EndDeposition,
                Action::Cancel,
                Action::Revert,
                Action::Reschedule,
                Action::AdmitParticipants,
                Action::ManageBreakRooms,
                Action::EditParticipants,
            ],
        );
        grant(
            Role::CourtReporter,
            &[
                Action::View,
                Action::ViewDetails,
                Action::OnRecord,
                Action::EndDeposition,
                Action::AdmitParticipants,
                Action::ManageBreakRooms,
            ],
        );
        grant(Role::Witness, &[Action::View, Action::ViewDetails]);
        grant(Role::Attendee, &[Action::View, Action::ViewDetails]);
        grant(Role::TechExpert, &[Action::View, Action::ViewDetails]);
        grant(Role::Observer, &[Action::View]);
        grant(
            Role::CompletedAttendee,
            &[Action::View, Action::ViewDetails],
        );

        Self { actions }
    }

    /// The action set for a role. Roles absent from the catalog resolve
    /// to the empty set (implicit deny).
    pub fn actions_for(&self, role: Role) -> HashSet<Action> {
        self.actions.get(&role).cloned().unwrap_or_default()
    }

    /// The full action set, granted to global admins.
    pub fn full_set(&self) -> HashSet<Action> {
        Action::ALL.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_is_seeded() {
        let catalog = PermissionCatalog::seed();
        for role in Role::ALL {
            assert!(
                !catalog.actions_for(*role).is_empty(),
                "role {role:?} has no actions"
            );
        }
    }

    #[test]
    fn case_admin_holds_the_full_set() {
        let catalog = PermissionCatalog::seed();
        assert_eq!(catalog.actions_for(Role::CaseAdmin), catalog.full_set());
    }

    #[test]
    fn completed_attendee_is_view_only() {
        let catalog = PermissionCatalog::seed();
        let actions = catalog.actions_for(Role::CompletedAttendee);
        assert_eq!(
            actions,
            [Action::View, Action::ViewDetails].into_iter().collect()
        );
    }

    #[test]
    fn witness_cannot_mutate() {
        let catalog = PermissionCatalog::seed();
        let actions = catalog.actions_for(Role::Witness);
        assert!(!actions.contains(&Action::OnRecord));
        assert!(!actions.contains(&Action::EndDeposition));
        assert!(!actions.contains(&Action::AdmitParticipants));
    }

    #[test]
    fn court_reporter_can_run_the_session() {
        let catalog = PermissionCatalog::seed();
        let actions = catalog.actions_for(Role::CourtReporter);
        assert!(actions.contains(&Action::OnRecord));
        assert!(actions.contains(&Action::EndDeposition));
        assert!(actions.contains(&Action::AdmitParticipants));
        assert!(!actions.contains(&Action::Delete));
    }

    #[test]
    fn session_roles_demote_on_completion() {
        assert!(Role::Witness.demotes_on_completion());
        assert!(Role::Attendee.demotes_on_completion());
        assert!(Role::Observer.demotes_on_completion());
        assert!(!Role::CourtReporter.demotes_on_completion());
        assert!(!Role::DepositionAdmin.demotes_on_completion());
        assert!(!Role::CompletedAttendee.demotes_on_completion());
    }

    #[test]
    fn role_round_trips() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(*role));
        }
        assert_eq!(Role::parse("paralegal"), None);
    }
}
