//! Closed vocabularies for the permission engine.
//!
//! Actions and resource types are tagged enums rather than free-form
//! strings so an unknown action is a compile error, not a silent deny.
//! The string forms exist only for persistence and API payloads.

use serde::{Deserialize, Serialize};

/// Everything a role can be allowed to do on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    ViewDetails,
    Update,
    Delete,
    OnRecord,
    EndDeposition,
    Cancel,
    Revert,
    Reschedule,
    AdmitParticipants,
    ManageBreakRooms,
    EditParticipants,
}

impl Action {
    /// All actions, in a fixed order. Used to build the full catalog set
    /// granted to global admins.
    pub const ALL: &'static [Action] = &[
        Action::View,
        Action::ViewDetails,
        Action::Update,
        Action::Delete,
        Action::OnRecord,
        Action::EndDeposition,
        Action::Cancel,
        Action::Revert,
        Action::Reschedule,
        Action::AdmitParticipants,
        Action::ManageBreakRooms,
        Action::EditParticipants,
    ];

    /// Stable string form used in API payloads and event detail text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::ViewDetails => "view_details",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::OnRecord => "on_record",
            Action::EndDeposition => "end_deposition",
            Action::Cancel => "cancel",
            Action::Revert => "revert",
            Action::Reschedule => "reschedule",
            Action::AdmitParticipants => "admit_participants",
            Action::ManageBreakRooms => "manage_break_rooms",
            Action::EditParticipants => "edit_participants",
        }
    }
}

/// The kinds of resource instance a role can be scoped to.
///
/// Open-ended in the data model sense (new kinds get a new variant), but
/// closed at compile time so the engine can never be asked about a
/// resource kind it does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Case,
    Deposition,
}

impl ResourceType {
    /// Stable string form used in the `role_assignments` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Case => "case",
            ResourceType::Deposition => "deposition",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown kinds.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "case" => Some(ResourceType::Case),
            "deposition" => Some(ResourceType::Deposition),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_actions_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for action in Action::ALL {
            assert!(seen.insert(action.as_str()), "duplicate {action:?}");
        }
        assert_eq!(seen.len(), Action::ALL.len());
    }

    #[test]
    fn resource_type_round_trips() {
        for rt in [ResourceType::Case, ResourceType::Deposition] {
            assert_eq!(ResourceType::parse(rt.as_str()), Some(rt));
        }
    }

    #[test]
    fn unknown_resource_type_is_none() {
        assert_eq!(ResourceType::parse("exhibit"), None);
    }
}
