//! Session orchestrator: the façade the API layer drives.
//!
//! Every operation follows the same sequence: authorize the actor
//! against the target resource, apply the intent through the state
//! machine / admission / break-room guards, persist through the store,
//! append a timeline event, and notify the sink. Status transitions go
//! through the store's compare-and-swap; the loser of a concurrent race
//! gets `Conflict` and may re-fetch and retry.

use std::collections::HashSet;
use std::sync::Arc;

use crate::action::{Action, ResourceType};
use crate::admission::AdmissionPolicy;
use crate::breakout::{ensure_deposition_live, BreakRoom, NewBreakRoom};
use crate::catalog::{PermissionCatalog, Role};
use crate::deposition::{
    validate_transition, Deposition, DepositionStatus, NewDeposition,
};
use crate::error::{CoreError, CoreResult};
use crate::event::{DepositionEvent, EventKind, NewDepositionEvent};
use crate::participant::{AdmissionStatus, NewParticipant, Participant, ParticipantSpec};
use crate::permission::{Actor, PermissionEngine};
use crate::store::{EventSink, RoomProvider, SessionStore};
use crate::types::{DbId, Timestamp};

/// Inbound request to schedule a deposition.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ScheduleRequest {
    pub case_id: DbId,
    pub scheduled_start: Timestamp,
    pub scheduled_end: Option<Timestamp>,
    pub details: Option<String>,
    pub video_recording_required: bool,
    pub shared_document_id: Option<DbId>,
    pub participants: Vec<ParticipantSpec>,
}

/// Result of a join attempt: seated immediately, or held in the
/// waiting room.
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    Admitted(Participant),
    Waiting(Participant),
}

pub struct SessionOrchestrator {
    store: Arc<dyn SessionStore>,
    rooms: Arc<dyn RoomProvider>,
    sink: Arc<dyn EventSink>,
    permissions: PermissionEngine,
    policy: AdmissionPolicy,
}

impl SessionOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        rooms: Arc<dyn RoomProvider>,
        sink: Arc<dyn EventSink>,
        policy: AdmissionPolicy,
    ) -> Self {
        let catalog = Arc::new(PermissionCatalog::seed());
        let permissions = PermissionEngine::new(catalog, Arc::clone(&store));
        Self {
            store,
            rooms,
            sink,
            permissions,
            policy,
        }
    }

    // -----------------------------------------------------------------------
    // Permissions
    // -----------------------------------------------------------------------

    /// The actor's effective action set on one resource. Pure read.
    pub async fn resolve_permissions(
        &self,
        actor: &Actor,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<HashSet<Action>> {
        self.permissions
            .resolve(actor, resource_type, resource_id)
            .await
    }

    /// Fail with `Forbidden` unless the actor may perform `action`.
    pub async fn authorize(
        &self,
        actor: &Actor,
        resource_type: ResourceType,
        resource_id: DbId,
        action: Action,
    ) -> CoreResult<()> {
        self.permissions
            .authorize(actor, resource_type, resource_id, action)
            .await
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Create a `Scheduled` deposition with its participant list,
    /// provision its rooms, and grant the requester a deposition-admin
    /// assignment.
    pub async fn schedule_deposition(
        &self,
        actor: &Actor,
        request: ScheduleRequest,
    ) -> CoreResult<Deposition> {
        self.permissions
            .authorize(actor, ResourceType::Case, request.case_id, Action::Update)
            .await?;
        validate_schedule(&request)?;

        let mut deposition = self
            .store
            .insert_deposition(NewDeposition {
                case_id: request.case_id,
                requester_id: actor.user_id,
                added_by_id: actor.user_id,
                shared_document_id: request.shared_document_id,
                scheduled_start: request.scheduled_start,
                scheduled_end: request.scheduled_end,
                details: request.details.clone(),
                video_recording_required: request.video_recording_required,
            })
            .await?;

        let room_ref = self
            .rooms
            .create_room(&format!("deposition-{}", deposition.id))
            .await?;
        let waiting_room_ref = self
            .rooms
            .create_room(&format!("deposition-{}-waiting", deposition.id))
            .await?;
        deposition.room_ref = Some(room_ref);
        deposition.waiting_room_ref = Some(waiting_room_ref);
        self.store.save_deposition(&deposition).await?;

        for spec in &request.participants {
            self.store
                .insert_participant(NewParticipant {
                    deposition_id: deposition.id,
                    user_id: spec.user_id,
                    name: spec.name.clone(),
                    email: spec.email.clone(),
                    role: spec.role,
                })
                .await?;
            if let Some(user_id) = spec.user_id {
                self.store
                    .upsert_role_assignment(
                        user_id,
                        ResourceType::Deposition,
                        deposition.id,
                        spec.role,
                    )
                    .await?;
            }
        }
        self.store
            .upsert_role_assignment(
                actor.user_id,
                ResourceType::Deposition,
                deposition.id,
                Role::DepositionAdmin,
            )
            .await?;

        tracing::info!(
            deposition_id = deposition.id,
            case_id = deposition.case_id,
            user_id = actor.user_id,
            "deposition scheduled"
        );
        self.record(
            deposition.id,
            EventKind::Scheduled,
            Some(actor.user_id),
            None,
        )
        .await?;

        Ok(deposition)
    }

    /// Toggle the on-the-record flag. Idempotent: re-applying the
    /// current value appends no event.
    pub async fn set_on_record(
        &self,
        actor: &Actor,
        deposition_id: DbId,
        value: bool,
    ) -> CoreResult<Deposition> {
        let mut deposition = self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(actor, ResourceType::Deposition, deposition_id, Action::OnRecord)
            .await?;
        deposition.ensure_can_toggle_record()?;

        if deposition.on_the_record == value {
            return Ok(deposition);
        }
        deposition.on_the_record = value;
        self.store.save_deposition(&deposition).await?;

        let kind = if value {
            EventKind::OnRecord
        } else {
            EventKind::OffRecord
        };
        self.record(deposition_id, kind, Some(actor.user_id), None)
            .await?;
        Ok(deposition)
    }

    /// Complete the deposition: stamp the completion time, demote
    /// attendee-tier roles to view-only, and close every break room.
    pub async fn end_deposition(
        &self,
        actor: &Actor,
        deposition_id: DbId,
    ) -> CoreResult<Deposition> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::EndDeposition,
            )
            .await?;
        validate_transition(deposition.status, DepositionStatus::Completed)?;

        let swapped = self
            .store
            .compare_and_swap_status(
                deposition_id,
                deposition.status,
                DepositionStatus::Completed,
            )
            .await?;
        if !swapped {
            return Err(CoreError::Conflict(
                "Deposition status changed concurrently".into(),
            ));
        }

        let mut deposition = self.store.load_deposition(deposition_id).await?;
        deposition.complete_date = Some(chrono::Utc::now());
        deposition.on_the_record = false;
        self.store.save_deposition(&deposition).await?;

        // Demotion is an explicit change-set: one store call rewrites
        // every attendee-tier assignment to view-only, so a failure
        // leaves either all or none of them demoted.
        self.store.demote_session_roles(deposition_id).await?;

        self.close_break_rooms(deposition_id).await?;

        tracing::info!(
            deposition_id,
            user_id = actor.user_id,
            "deposition completed"
        );
        self.record(
            deposition_id,
            EventKind::Completed,
            Some(actor.user_id),
            None,
        )
        .await?;
        Ok(deposition)
    }

    /// Cancel a live deposition. Cancellation is a status, not a
    /// deletion; role assignments are left untouched so a revert
    /// restores the session exactly.
    pub async fn cancel_deposition(
        &self,
        actor: &Actor,
        deposition_id: DbId,
    ) -> CoreResult<Deposition> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(actor, ResourceType::Deposition, deposition_id, Action::Cancel)
            .await?;
        validate_transition(deposition.status, DepositionStatus::Canceled)?;

        let swapped = self
            .store
            .compare_and_swap_status(deposition_id, deposition.status, DepositionStatus::Canceled)
            .await?;
        if !swapped {
            return Err(CoreError::Conflict(
                "Deposition status changed concurrently".into(),
            ));
        }

        self.close_break_rooms(deposition_id).await?;

        tracing::info!(deposition_id, user_id = actor.user_id, "deposition canceled");
        self.record(deposition_id, EventKind::Canceled, Some(actor.user_id), None)
            .await?;
        self.store.load_deposition(deposition_id).await
    }

    /// Return a canceled deposition to `Scheduled`.
    pub async fn revert_cancel(
        &self,
        actor: &Actor,
        deposition_id: DbId,
    ) -> CoreResult<Deposition> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(actor, ResourceType::Deposition, deposition_id, Action::Revert)
            .await?;
        validate_transition(deposition.status, DepositionStatus::Scheduled)?;

        let swapped = self
            .store
            .compare_and_swap_status(
                deposition_id,
                DepositionStatus::Canceled,
                DepositionStatus::Scheduled,
            )
            .await?;
        if !swapped {
            return Err(CoreError::Conflict(
                "Deposition status changed concurrently".into(),
            ));
        }

        self.record(
            deposition_id,
            EventKind::CancelReverted,
            Some(actor.user_id),
            None,
        )
        .await?;
        self.store.load_deposition(deposition_id).await
    }

    /// Move the scheduled window. Legal in every state except
    /// `Completed`.
    pub async fn reschedule_deposition(
        &self,
        actor: &Actor,
        deposition_id: DbId,
        new_start: Timestamp,
        new_end: Option<Timestamp>,
        new_document_id: Option<DbId>,
    ) -> CoreResult<Deposition> {
        let mut deposition = self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::Reschedule,
            )
            .await?;
        if deposition.status == DepositionStatus::Completed {
            return Err(CoreError::InvalidState(
                "Cannot reschedule a completed deposition".into(),
            ));
        }
        if let Some(end) = new_end {
            if end <= new_start {
                return Err(CoreError::Validation(
                    "Scheduled end must be after the start".into(),
                ));
            }
        }

        deposition.scheduled_start = new_start;
        deposition.scheduled_end = new_end;
        if new_document_id.is_some() {
            deposition.shared_document_id = new_document_id;
        }
        self.store.save_deposition(&deposition).await?;

        self.record(
            deposition_id,
            EventKind::Rescheduled,
            Some(actor.user_id),
            None,
        )
        .await?;
        Ok(deposition)
    }

    // -----------------------------------------------------------------------
    // Admission gate
    // -----------------------------------------------------------------------

    /// A participant asks to be seated. Exempt participants are seated
    /// immediately; everyone else is placed (or re-placed, on
    /// reconnect) in the pending queue. Denied participants stay out
    /// for the remainder of the live session.
    pub async fn join_deposition(
        &self,
        deposition_id: DbId,
        participant_id: DbId,
    ) -> CoreResult<JoinOutcome> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        if !deposition.status.is_live() {
            return Err(CoreError::InvalidState(format!(
                "Cannot join a {} deposition",
                deposition.status.as_str()
            )));
        }

        let mut participant = self.load_owned_participant(deposition_id, participant_id).await?;
        if participant.admission == AdmissionStatus::Denied {
            return Err(CoreError::Forbidden(
                "Admission was denied for this session".into(),
            ));
        }

        if self.is_admission_exempt(&deposition, &participant).await? {
            participant.admission = AdmissionStatus::Admitted;
            participant.has_joined = true;
            self.store.save_participant(&participant).await?;
            self.mark_in_progress_on_first_join(&deposition).await?;
            self.record(
                deposition_id,
                EventKind::ParticipantJoined,
                participant.user_id,
                Some(format!("{} joined", participant.name)),
            )
            .await?;
            Ok(JoinOutcome::Admitted(participant))
        } else {
            // Re-evaluated on every join: a reconnect goes back to
            // pending rather than reusing a stale admit.
            participant.admission = AdmissionStatus::Pending;
            participant.has_joined = false;
            self.store.save_participant(&participant).await?;
            self.record(
                deposition_id,
                EventKind::AdmissionRequested,
                participant.user_id,
                Some(format!("{} is waiting for admission", participant.name)),
            )
            .await?;
            Ok(JoinOutcome::Waiting(participant))
        }
    }

    /// Admit or deny one pending participant. The tri-state write is a
    /// compare-and-swap: of two concurrent deciders exactly one wins,
    /// the other gets `Conflict`.
    pub async fn decide_admission(
        &self,
        actor: &Actor,
        deposition_id: DbId,
        participant_id: DbId,
        admit: bool,
    ) -> CoreResult<Participant> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        if !deposition.status.is_live() {
            return Err(CoreError::InvalidState(format!(
                "Cannot decide admission on a {} deposition",
                deposition.status.as_str()
            )));
        }
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::AdmitParticipants,
            )
            .await?;
        let participant = self.load_owned_participant(deposition_id, participant_id).await?;

        let next = if admit {
            AdmissionStatus::Admitted
        } else {
            AdmissionStatus::Denied
        };
        let decided = self.store.decide_admission(participant_id, next).await?;
        if !decided {
            return Err(CoreError::Conflict(
                "Admission was already decided by another admitter".into(),
            ));
        }

        let mut participant = self.store.load_participant(participant_id).await?;
        if admit {
            participant.has_joined = true;
            self.store.save_participant(&participant).await?;
            self.mark_in_progress_on_first_join(&deposition).await?;
        }

        let kind = if admit {
            EventKind::AdmissionGranted
        } else {
            EventKind::AdmissionDenied
        };
        self.record(
            deposition_id,
            kind,
            Some(actor.user_id),
            Some(format!("{} ({})", participant.name, next.as_str())),
        )
        .await?;
        Ok(participant)
    }

    /// Change a participant's session role. Legal until the deposition
    /// completes; the matching role assignment is rewritten so the
    /// participant's permissions follow the new role.
    pub async fn set_participant_role(
        &self,
        actor: &Actor,
        deposition_id: DbId,
        participant_id: DbId,
        role: Role,
    ) -> CoreResult<Participant> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::EditParticipants,
            )
            .await?;
        if deposition.status == DepositionStatus::Completed {
            return Err(CoreError::InvalidState(
                "Cannot edit participants of a completed deposition".into(),
            ));
        }
        if role == Role::CompletedAttendee {
            return Err(CoreError::Validation(
                "The completed_attendee role is assigned by session completion".into(),
            ));
        }

        let mut participant = self.load_owned_participant(deposition_id, participant_id).await?;
        if participant.role == role {
            return Ok(participant);
        }
        participant.role = role;
        self.store.save_participant(&participant).await?;
        if let Some(user_id) = participant.user_id {
            self.store
                .upsert_role_assignment(user_id, ResourceType::Deposition, deposition_id, role)
                .await?;
        }

        self.record(
            deposition_id,
            EventKind::ParticipantRoleChanged,
            Some(actor.user_id),
            Some(format!("{} is now {}", participant.name, role.as_str())),
        )
        .await?;
        Ok(participant)
    }

    /// The current waiting-room queue, for an authorized admitter.
    pub async fn list_pending_participants(
        &self,
        actor: &Actor,
        deposition_id: DbId,
    ) -> CoreResult<Vec<Participant>> {
        self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::AdmitParticipants,
            )
            .await?;
        self.store.list_pending(deposition_id).await
    }

    // -----------------------------------------------------------------------
    // Break rooms
    // -----------------------------------------------------------------------

    /// Create an unlocked break room. Only legal while the deposition
    /// is in progress.
    pub async fn create_break_room(
        &self,
        actor: &Actor,
        deposition_id: DbId,
        name: &str,
    ) -> CoreResult<BreakRoom> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        ensure_deposition_live(&deposition)?;
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::ManageBreakRooms,
            )
            .await?;
        if name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Break room name must not be empty".into(),
            ));
        }

        let room_ref = self.rooms.create_room(name).await?;
        let room = self
            .store
            .insert_break_room(NewBreakRoom {
                deposition_id,
                room_ref,
                name: name.to_string(),
            })
            .await?;

        self.record(
            deposition_id,
            EventKind::BreakRoomCreated,
            Some(actor.user_id),
            Some(room.name.clone()),
        )
        .await?;
        Ok(room)
    }

    /// Lock or unlock a break room. Locked rooms reject new joins but
    /// never evict current members.
    pub async fn lock_break_room(
        &self,
        actor: &Actor,
        deposition_id: DbId,
        room_id: DbId,
        locked: bool,
    ) -> CoreResult<BreakRoom> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        ensure_deposition_live(&deposition)?;
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::ManageBreakRooms,
            )
            .await?;
        let mut room = self.load_owned_break_room(deposition_id, room_id).await?;

        if room.locked == locked {
            return Ok(room);
        }
        room.locked = locked;
        self.store.save_break_room(&room).await?;

        let kind = if locked {
            EventKind::BreakRoomLocked
        } else {
            EventKind::BreakRoomUnlocked
        };
        self.record(deposition_id, kind, Some(actor.user_id), Some(room.name.clone()))
            .await?;
        Ok(room)
    }

    /// Seat an admitted participant in a break room.
    pub async fn join_break_room(
        &self,
        deposition_id: DbId,
        room_id: DbId,
        participant_id: DbId,
    ) -> CoreResult<BreakRoom> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        ensure_deposition_live(&deposition)?;
        let participant = self.load_owned_participant(deposition_id, participant_id).await?;
        if participant.admission != AdmissionStatus::Admitted {
            return Err(CoreError::Forbidden(
                "Only admitted participants may use break rooms".into(),
            ));
        }
        let room = self.load_owned_break_room(deposition_id, room_id).await?;
        room.ensure_joinable_by(participant_id)?;

        self.store
            .add_break_room_member(room_id, participant_id)
            .await?;
        self.record(
            deposition_id,
            EventKind::BreakRoomJoined,
            participant.user_id,
            Some(format!("{} entered {}", participant.name, room.name)),
        )
        .await?;
        self.store.load_break_room(room_id).await
    }

    /// Remove a participant from a break room. Always legal for the
    /// participant, regardless of lock state or deposition status.
    pub async fn leave_break_room(
        &self,
        deposition_id: DbId,
        room_id: DbId,
        participant_id: DbId,
    ) -> CoreResult<()> {
        let participant = self.load_owned_participant(deposition_id, participant_id).await?;
        let room = self.load_owned_break_room(deposition_id, room_id).await?;

        self.store
            .remove_break_room_member(room_id, participant_id)
            .await?;
        self.record(
            deposition_id,
            EventKind::BreakRoomLeft,
            participant.user_id,
            Some(format!("{} left {}", participant.name, room.name)),
        )
        .await?;
        Ok(())
    }

    /// One deposition by id. Pure read.
    pub async fn get_deposition(
        &self,
        actor: &Actor,
        deposition_id: DbId,
    ) -> CoreResult<Deposition> {
        let deposition = self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(actor, ResourceType::Deposition, deposition_id, Action::View)
            .await?;
        Ok(deposition)
    }

    /// Break rooms of one deposition. Pure read.
    pub async fn list_break_rooms(
        &self,
        actor: &Actor,
        deposition_id: DbId,
    ) -> CoreResult<Vec<BreakRoom>> {
        self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(actor, ResourceType::Deposition, deposition_id, Action::View)
            .await?;
        self.store.list_break_rooms(deposition_id).await
    }

    /// Activity timeline of one deposition. Pure read.
    pub async fn list_events(
        &self,
        actor: &Actor,
        deposition_id: DbId,
    ) -> CoreResult<Vec<DepositionEvent>> {
        self.store.load_deposition(deposition_id).await?;
        self.permissions
            .authorize(
                actor,
                ResourceType::Deposition,
                deposition_id,
                Action::ViewDetails,
            )
            .await?;
        self.store.list_events(deposition_id).await
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn load_owned_participant(
        &self,
        deposition_id: DbId,
        participant_id: DbId,
    ) -> CoreResult<Participant> {
        let participant = self.store.load_participant(participant_id).await?;
        if participant.deposition_id != deposition_id {
            return Err(CoreError::NotFound {
                entity: "Participant",
                id: participant_id,
            });
        }
        Ok(participant)
    }

    async fn load_owned_break_room(
        &self,
        deposition_id: DbId,
        room_id: DbId,
    ) -> CoreResult<BreakRoom> {
        let room = self.store.load_break_room(room_id).await?;
        if room.deposition_id != deposition_id {
            return Err(CoreError::NotFound {
                entity: "BreakRoom",
                id: room_id,
            });
        }
        Ok(room)
    }

    /// Waiting-room exemption: the configured policy, plus any
    /// admin-tier role assignment on the deposition or its case.
    async fn is_admission_exempt(
        &self,
        deposition: &Deposition,
        participant: &Participant,
    ) -> CoreResult<bool> {
        if self.policy.is_exempt(deposition, participant) {
            return Ok(true);
        }
        let Some(user_id) = participant.user_id else {
            return Ok(false);
        };
        if let Some(role) = self
            .store
            .find_role_assignment(user_id, ResourceType::Deposition, deposition.id)
            .await?
        {
            if matches!(role, Role::CaseAdmin | Role::DepositionAdmin) {
                return Ok(true);
            }
        }
        Ok(matches!(
            self.store
                .find_role_assignment(user_id, ResourceType::Case, deposition.case_id)
                .await?,
            Some(Role::CaseAdmin)
        ))
    }

    /// First admitted join moves `Scheduled` to `InProgress`. Losing
    /// the swap only means another join got there first.
    async fn mark_in_progress_on_first_join(&self, deposition: &Deposition) -> CoreResult<()> {
        if deposition.status == DepositionStatus::Scheduled {
            let _ = self
                .store
                .compare_and_swap_status(
                    deposition.id,
                    DepositionStatus::Scheduled,
                    DepositionStatus::InProgress,
                )
                .await?;
        }
        Ok(())
    }

    /// Ask the provider to tear down every break room of a deposition.
    /// Provider failures are logged, not fatal: the status change has
    /// already committed and the rooms are unjoinable either way.
    async fn close_break_rooms(&self, deposition_id: DbId) -> CoreResult<()> {
        for room in self.store.list_break_rooms(deposition_id).await? {
            if let Err(err) = self.rooms.close_room(&room.room_ref).await {
                tracing::warn!(
                    deposition_id,
                    room_id = room.id,
                    error = %err,
                    "failed to close break room with provider"
                );
            }
        }
        Ok(())
    }

    async fn record(
        &self,
        deposition_id: DbId,
        kind: EventKind,
        actor_user_id: Option<DbId>,
        detail: Option<String>,
    ) -> CoreResult<()> {
        let event = self
            .store
            .append_event(NewDepositionEvent {
                deposition_id,
                kind,
                actor_user_id,
                detail,
            })
            .await?;
        self.sink.notify(&event);
        Ok(())
    }
}

fn validate_schedule(request: &ScheduleRequest) -> CoreResult<()> {
    if let Some(end) = request.scheduled_end {
        if end <= request.scheduled_start {
            return Err(CoreError::Validation(
                "Scheduled end must be after the start".into(),
            ));
        }
    }
    let has_witness = request
        .participants
        .iter()
        .any(|p| p.role == Role::Witness);
    if !has_witness {
        return Err(CoreError::Validation(
            "A deposition requires a witness".into(),
        ));
    }
    let has_reporter = request
        .participants
        .iter()
        .any(|p| p.role == Role::CourtReporter);
    if !has_reporter {
        return Err(CoreError::Validation(
            "A deposition requires a court reporter".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{CollectingSink, MemoryStore, StubRoomProvider};

    const CASE_ID: DbId = 100;
    const REQUESTER: Actor = Actor {
        user_id: 1,
        is_global_admin: false,
    };
    const WITNESS_USER: DbId = 20;
    const REPORTER_USER: DbId = 30;
    const ATTENDEE_USER: DbId = 40;

    struct Fixture {
        store: Arc<MemoryStore>,
        rooms: Arc<StubRoomProvider>,
        sink: Arc<CollectingSink>,
        orch: SessionOrchestrator,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let rooms = Arc::new(StubRoomProvider::new());
        let sink = Arc::new(CollectingSink::new());
        let orch = SessionOrchestrator::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::clone(&rooms) as Arc<dyn RoomProvider>,
            Arc::clone(&sink) as Arc<dyn EventSink>,
            AdmissionPolicy::default(),
        );
        // The requester administers the owning case.
        store
            .upsert_role_assignment(REQUESTER.user_id, ResourceType::Case, CASE_ID, Role::CaseAdmin)
            .await
            .unwrap();
        Fixture {
            store,
            rooms,
            sink,
            orch,
        }
    }

    fn schedule_request() -> ScheduleRequest {
        let start = chrono::Utc::now() + chrono::Duration::days(1);
        ScheduleRequest {
            case_id: CASE_ID,
            scheduled_start: start,
            scheduled_end: Some(start + chrono::Duration::hours(4)),
            details: Some("Deposition of the witness".into()),
            video_recording_required: true,
            shared_document_id: None,
            participants: vec![
                ParticipantSpec {
                    user_id: Some(WITNESS_USER),
                    name: "Wendy Witness".into(),
                    email: None,
                    role: Role::Witness,
                },
                ParticipantSpec {
                    user_id: Some(REPORTER_USER),
                    name: "Cora Reporter".into(),
                    email: None,
                    role: Role::CourtReporter,
                },
                ParticipantSpec {
                    user_id: Some(ATTENDEE_USER),
                    name: "Alex Attendee".into(),
                    email: None,
                    role: Role::Attendee,
                },
            ],
        }
    }

    async fn scheduled(f: &Fixture) -> Deposition {
        f.orch
            .schedule_deposition(&REQUESTER, schedule_request())
            .await
            .unwrap()
    }

    async fn participant_by_user(f: &Fixture, deposition_id: DbId, user_id: DbId) -> Participant {
        // Ids are assigned sequentially; scan the pending list plus a
        // direct probe over known ids.
        for id in 1..100 {
            if let Ok(p) = f.store.load_participant(id).await {
                if p.deposition_id == deposition_id && p.user_id == Some(user_id) {
                    return p;
                }
            }
        }
        panic!("participant for user {user_id} not found");
    }

    fn reporter() -> Actor {
        Actor {
            user_id: REPORTER_USER,
            is_global_admin: false,
        }
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn schedule_creates_scheduled_deposition_with_rooms() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        assert_eq!(dep.status, DepositionStatus::Scheduled);
        assert!(!dep.on_the_record);
        assert!(dep.room_ref.is_some());
        assert!(dep.waiting_room_ref.is_some());

        let events = f.store.list_events(dep.id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Scheduled);
        assert_eq!(f.sink.events().len(), 1);
    }

    #[tokio::test]
    async fn schedule_grants_requester_deposition_admin() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        let role = f
            .store
            .find_role_assignment(REQUESTER.user_id, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(role, Some(Role::DepositionAdmin));
    }

    #[tokio::test]
    async fn schedule_without_witness_is_rejected() {
        let f = fixture().await;
        let mut request = schedule_request();
        request.participants.retain(|p| p.role != Role::Witness);

        let err = f
            .orch
            .schedule_deposition(&REQUESTER, request)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn schedule_without_court_reporter_is_rejected() {
        let f = fixture().await;
        let mut request = schedule_request();
        request.participants.retain(|p| p.role != Role::CourtReporter);

        let err = f
            .orch
            .schedule_deposition(&REQUESTER, request)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn schedule_with_end_before_start_is_rejected() {
        let f = fixture().await;
        let mut request = schedule_request();
        request.scheduled_end = Some(request.scheduled_start - chrono::Duration::hours(1));

        let err = f
            .orch
            .schedule_deposition(&REQUESTER, request)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn schedule_requires_case_permission() {
        let f = fixture().await;
        let stranger = Actor {
            user_id: 999,
            is_global_admin: false,
        };

        let err = f
            .orch
            .schedule_deposition(&stranger, schedule_request())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    // -----------------------------------------------------------------------
    // Admission gate
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn court_reporter_is_auto_admitted_and_never_pending() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let cora = participant_by_user(&f, dep.id, REPORTER_USER).await;

        let outcome = f.orch.join_deposition(dep.id, cora.id).await.unwrap();
        let seated = match outcome {
            JoinOutcome::Admitted(p) => p,
            JoinOutcome::Waiting(_) => panic!("reporter should be auto-admitted"),
        };
        assert_eq!(seated.admission, AdmissionStatus::Admitted);
        assert!(seated.has_joined);

        let pending = f.store.list_pending(dep.id).await.unwrap();
        assert!(pending.iter().all(|p| p.id != cora.id));
    }

    #[tokio::test]
    async fn witness_is_held_pending() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;

        let outcome = f.orch.join_deposition(dep.id, wendy.id).await.unwrap();
        assert!(matches!(outcome, JoinOutcome::Waiting(_)));

        let pending = f.orch.list_pending_participants(&reporter(), dep.id).await;
        // The reporter has an AdmitParticipants grant from scheduling.
        let pending = pending.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, wendy.id);
    }

    #[tokio::test]
    async fn first_admitted_join_starts_the_deposition() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let cora = participant_by_user(&f, dep.id, REPORTER_USER).await;

        f.orch.join_deposition(dep.id, cora.id).await.unwrap();

        let dep = f.store.load_deposition(dep.id).await.unwrap();
        assert_eq!(dep.status, DepositionStatus::InProgress);
    }

    #[tokio::test]
    async fn pending_join_does_not_start_the_deposition() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;

        f.orch.join_deposition(dep.id, wendy.id).await.unwrap();

        let dep = f.store.load_deposition(dep.id).await.unwrap();
        assert_eq!(dep.status, DepositionStatus::Scheduled);
    }

    #[tokio::test]
    async fn admit_decision_seats_the_participant() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;
        f.orch.join_deposition(dep.id, wendy.id).await.unwrap();

        let seated = f
            .orch
            .decide_admission(&reporter(), dep.id, wendy.id, true)
            .await
            .unwrap();
        assert_eq!(seated.admission, AdmissionStatus::Admitted);
        assert!(seated.has_joined);
    }

    #[tokio::test]
    async fn second_decision_loses_with_conflict() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;
        f.orch.join_deposition(dep.id, wendy.id).await.unwrap();

        f.orch
            .decide_admission(&reporter(), dep.id, wendy.id, true)
            .await
            .unwrap();
        let err = f
            .orch
            .decide_admission(&REQUESTER, dep.id, wendy.id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        // The first decision stands.
        let wendy = f.store.load_participant(wendy.id).await.unwrap();
        assert_eq!(wendy.admission, AdmissionStatus::Admitted);
    }

    #[tokio::test]
    async fn denied_participant_cannot_rejoin() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;
        f.orch.join_deposition(dep.id, wendy.id).await.unwrap();
        f.orch
            .decide_admission(&reporter(), dep.id, wendy.id, false)
            .await
            .unwrap();

        let err = f.orch.join_deposition(dep.id, wendy.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn reconnect_returns_to_pending() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;
        f.orch.join_deposition(dep.id, wendy.id).await.unwrap();
        f.orch
            .decide_admission(&reporter(), dep.id, wendy.id, true)
            .await
            .unwrap();

        // Disconnect and rejoin: back to the waiting room.
        let outcome = f.orch.join_deposition(dep.id, wendy.id).await.unwrap();
        assert!(matches!(outcome, JoinOutcome::Waiting(_)));
    }

    #[tokio::test]
    async fn deciding_requires_admit_permission() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;
        f.orch.join_deposition(dep.id, wendy.id).await.unwrap();

        let attendee = Actor {
            user_id: ATTENDEE_USER,
            is_global_admin: false,
        };
        let err = f
            .orch
            .decide_admission(&attendee, dep.id, wendy.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    // -----------------------------------------------------------------------
    // Participant editing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn role_edit_updates_participant_and_assignment() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let alex = participant_by_user(&f, dep.id, ATTENDEE_USER).await;

        let edited = f
            .orch
            .set_participant_role(&REQUESTER, dep.id, alex.id, Role::TechExpert)
            .await
            .unwrap();
        assert_eq!(edited.role, Role::TechExpert);

        let assignment = f
            .store
            .find_role_assignment(ATTENDEE_USER, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(assignment, Some(Role::TechExpert));

        let kinds: Vec<_> = f
            .store
            .list_events(dep.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert!(kinds.contains(&EventKind::ParticipantRoleChanged));
    }

    #[tokio::test]
    async fn role_edit_requires_edit_permission() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let alex = participant_by_user(&f, dep.id, ATTENDEE_USER).await;

        // The reporter's grant does not include participant editing.
        let err = f
            .orch
            .set_participant_role(&reporter(), dep.id, alex.id, Role::TechExpert)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn role_edit_after_completion_fails() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let alex = participant_by_user(&f, dep.id, ATTENDEE_USER).await;
        f.orch.end_deposition(&REQUESTER, dep.id).await.unwrap();

        let err = f
            .orch
            .set_participant_role(&REQUESTER, dep.id, alex.id, Role::TechExpert)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn completed_attendee_is_not_assignable_by_edit() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let alex = participant_by_user(&f, dep.id, ATTENDEE_USER).await;

        let err = f
            .orch
            .set_participant_role(&REQUESTER, dep.id, alex.id, Role::CompletedAttendee)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    // -----------------------------------------------------------------------
    // On the record
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn set_on_record_is_idempotent() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        let dep1 = f.orch.set_on_record(&reporter(), dep.id, true).await.unwrap();
        assert!(dep1.on_the_record);
        let dep2 = f.orch.set_on_record(&reporter(), dep.id, true).await.unwrap();
        assert!(dep2.on_the_record);

        let on_record_events: Vec<_> = f
            .store
            .list_events(dep.id)
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.kind == EventKind::OnRecord)
            .collect();
        assert_eq!(on_record_events.len(), 1);
    }

    #[tokio::test]
    async fn set_on_record_requires_permission() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let witness = Actor {
            user_id: WITNESS_USER,
            is_global_admin: false,
        };

        let err = f
            .orch
            .set_on_record(&witness, dep.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn set_on_record_fails_after_completion() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        f.orch.end_deposition(&REQUESTER, dep.id).await.unwrap();

        let err = f
            .orch
            .set_on_record(&reporter(), dep.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    // -----------------------------------------------------------------------
    // End / cancel / revert
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn end_stamps_completion_and_demotes_attendees() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        let done = f.orch.end_deposition(&reporter(), dep.id).await.unwrap();
        assert_eq!(done.status, DepositionStatus::Completed);
        assert!(done.complete_date.is_some());

        let witness_role = f
            .store
            .find_role_assignment(WITNESS_USER, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(witness_role, Some(Role::CompletedAttendee));
        let attendee_role = f
            .store
            .find_role_assignment(ATTENDEE_USER, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(attendee_role, Some(Role::CompletedAttendee));
        // Admin-tier grants survive.
        let requester_role = f
            .store
            .find_role_assignment(REQUESTER.user_id, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(requester_role, Some(Role::DepositionAdmin));
    }

    #[tokio::test]
    async fn demotion_rewrites_all_attendee_tier_roles_in_one_call() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        f.store.demote_session_roles(dep.id).await.unwrap();

        for user in [WITNESS_USER, ATTENDEE_USER] {
            let role = f
                .store
                .find_role_assignment(user, ResourceType::Deposition, dep.id)
                .await
                .unwrap();
            assert_eq!(role, Some(Role::CompletedAttendee));
        }
        // Admin-tier and reporter grants are untouched.
        let reporter_role = f
            .store
            .find_role_assignment(REPORTER_USER, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(reporter_role, Some(Role::CourtReporter));
        let requester_role = f
            .store
            .find_role_assignment(REQUESTER.user_id, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(requester_role, Some(Role::DepositionAdmin));
    }

    #[tokio::test]
    async fn end_twice_fails_with_invalid_state() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        f.orch.end_deposition(&REQUESTER, dep.id).await.unwrap();

        let err = f.orch.end_deposition(&REQUESTER, dep.id).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn end_on_canceled_fails_with_invalid_state() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        f.orch.cancel_deposition(&REQUESTER, dep.id).await.unwrap();

        let err = f.orch.end_deposition(&REQUESTER, dep.id).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn concurrent_end_and_cancel_cannot_both_succeed() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        // Simulate the race: cancel commits between end's load and swap.
        f.store
            .compare_and_swap_status(dep.id, DepositionStatus::Scheduled, DepositionStatus::Canceled)
            .await
            .unwrap();
        let err = f.orch.cancel_deposition(&REQUESTER, dep.id).await.unwrap_err();
        // The loser observes either the stale-status swap failure or the
        // already-canceled state, depending on when it re-reads.
        assert!(matches!(
            err,
            CoreError::Conflict(_) | CoreError::InvalidState(_)
        ));
    }

    #[tokio::test]
    async fn cancel_then_revert_restores_scheduled_and_roles() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let before = f
            .store
            .list_role_assignments(ResourceType::Deposition, dep.id)
            .await
            .unwrap();

        f.orch.cancel_deposition(&REQUESTER, dep.id).await.unwrap();
        let reverted = f.orch.revert_cancel(&REQUESTER, dep.id).await.unwrap();
        assert_eq!(reverted.status, DepositionStatus::Scheduled);

        let after = f
            .store
            .list_role_assignments(ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        let roles = |assignments: &[crate::store::RoleAssignment]| {
            assignments
                .iter()
                .map(|a| (a.user_id, a.role))
                .collect::<Vec<_>>()
        };
        assert_eq!(roles(&before), roles(&after));
    }

    #[tokio::test]
    async fn revert_is_only_legal_from_canceled() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        let err = f.orch.revert_cancel(&REQUESTER, dep.id).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn reschedule_on_completed_fails() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        f.orch.end_deposition(&REQUESTER, dep.id).await.unwrap();

        let start = chrono::Utc::now() + chrono::Duration::days(2);
        let err = f
            .orch
            .reschedule_deposition(&REQUESTER, dep.id, start, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn reschedule_moves_the_window() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let start = chrono::Utc::now() + chrono::Duration::days(3);
        let end = start + chrono::Duration::hours(2);

        let updated = f
            .orch
            .reschedule_deposition(&REQUESTER, dep.id, start, Some(end), None)
            .await
            .unwrap();
        assert_eq!(updated.scheduled_start, start);
        assert_eq!(updated.scheduled_end, Some(end));

        let kinds: Vec<_> = f
            .store
            .list_events(dep.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert!(kinds.contains(&EventKind::Rescheduled));
    }

    // -----------------------------------------------------------------------
    // Break rooms
    // -----------------------------------------------------------------------

    /// Brings a deposition in progress with the reporter seated and the
    /// witness admitted.
    async fn in_progress(f: &Fixture) -> (Deposition, Participant, Participant) {
        let dep = scheduled(f).await;
        let cora = participant_by_user(f, dep.id, REPORTER_USER).await;
        f.orch.join_deposition(dep.id, cora.id).await.unwrap();
        let wendy = participant_by_user(f, dep.id, WITNESS_USER).await;
        f.orch.join_deposition(dep.id, wendy.id).await.unwrap();
        f.orch
            .decide_admission(&reporter(), dep.id, wendy.id, true)
            .await
            .unwrap();
        let dep = f.store.load_deposition(dep.id).await.unwrap();
        let cora = f.store.load_participant(cora.id).await.unwrap();
        let wendy = f.store.load_participant(wendy.id).await.unwrap();
        (dep, cora, wendy)
    }

    #[tokio::test]
    async fn break_room_requires_in_progress() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        let err = f
            .orch
            .create_break_room(&reporter(), dep.id, "Counsel")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn break_room_create_join_leave() {
        let f = fixture().await;
        let (dep, _, wendy) = in_progress(&f).await;

        let room = f
            .orch
            .create_break_room(&reporter(), dep.id, "Counsel")
            .await
            .unwrap();
        assert!(!room.locked);

        let room = f
            .orch
            .join_break_room(dep.id, room.id, wendy.id)
            .await
            .unwrap();
        assert!(room.is_member(wendy.id));

        f.orch
            .leave_break_room(dep.id, room.id, wendy.id)
            .await
            .unwrap();
        let room = f.store.load_break_room(room.id).await.unwrap();
        assert!(!room.is_member(wendy.id));
    }

    #[tokio::test]
    async fn locked_room_rejects_new_joins_but_keeps_members() {
        let f = fixture().await;
        let (dep, cora, wendy) = in_progress(&f).await;
        let room = f
            .orch
            .create_break_room(&reporter(), dep.id, "Counsel")
            .await
            .unwrap();
        f.orch
            .join_break_room(dep.id, room.id, cora.id)
            .await
            .unwrap();

        f.orch
            .lock_break_room(&reporter(), dep.id, room.id, true)
            .await
            .unwrap();

        let err = f
            .orch
            .join_break_room(dep.id, room.id, wendy.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        // Existing member re-enters fine.
        f.orch
            .join_break_room(dep.id, room.id, cora.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pending_participant_cannot_join_break_rooms() {
        let f = fixture().await;
        let (dep, _, _) = in_progress(&f).await;
        let alex = participant_by_user(&f, dep.id, ATTENDEE_USER).await;
        let room = f
            .orch
            .create_break_room(&reporter(), dep.id, "Counsel")
            .await
            .unwrap();

        let err = f
            .orch
            .join_break_room(dep.id, room.id, alex.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn ending_the_deposition_closes_break_rooms() {
        let f = fixture().await;
        let (dep, _, wendy) = in_progress(&f).await;
        let room = f
            .orch
            .create_break_room(&reporter(), dep.id, "Counsel")
            .await
            .unwrap();

        f.orch.end_deposition(&reporter(), dep.id).await.unwrap();

        // Provider rooms torn down.
        assert!(f.rooms.closed_rooms().contains(&room.room_ref));
        // Row still exists, but join and lock now fail.
        let err = f
            .orch
            .join_break_room(dep.id, room.id, wendy.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        let err = f
            .orch
            .lock_break_room(&reporter(), dep.id, room.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    // -----------------------------------------------------------------------
    // End-to-end
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn full_session_scenario() {
        let f = fixture().await;
        let dep = scheduled(&f).await;

        // Reporter joins: auto-admitted, session starts.
        let cora = participant_by_user(&f, dep.id, REPORTER_USER).await;
        let outcome = f.orch.join_deposition(dep.id, cora.id).await.unwrap();
        assert!(matches!(outcome, JoinOutcome::Admitted(_)));

        // Witness joins: held pending.
        let wendy = participant_by_user(&f, dep.id, WITNESS_USER).await;
        let outcome = f.orch.join_deposition(dep.id, wendy.id).await.unwrap();
        assert!(matches!(outcome, JoinOutcome::Waiting(_)));

        // Reporter admits the witness.
        let wendy = f
            .orch
            .decide_admission(&reporter(), dep.id, wendy.id, true)
            .await
            .unwrap();
        assert_eq!(wendy.admission, AdmissionStatus::Admitted);
        assert!(wendy.has_joined);

        // On the record.
        f.orch.set_on_record(&reporter(), dep.id, true).await.unwrap();
        let on_record: Vec<_> = f
            .store
            .list_events(dep.id)
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.kind == EventKind::OnRecord)
            .collect();
        assert_eq!(on_record.len(), 1);

        // End: completed, stamped, witness demoted to view-only.
        let done = f.orch.end_deposition(&reporter(), dep.id).await.unwrap();
        assert_eq!(done.status, DepositionStatus::Completed);
        assert!(done.complete_date.is_some());
        let witness_role = f
            .store
            .find_role_assignment(WITNESS_USER, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(witness_role, Some(Role::CompletedAttendee));

        // Every step landed on the notification sink.
        assert_eq!(
            f.sink.events().len(),
            f.store.list_events(dep.id).await.unwrap().len()
        );
    }

    #[tokio::test]
    async fn global_admin_bypasses_assignments() {
        let f = fixture().await;
        let dep = scheduled(&f).await;
        let admin = Actor {
            user_id: 777,
            is_global_admin: true,
        };

        let actions = f
            .orch
            .resolve_permissions(&admin, ResourceType::Deposition, dep.id)
            .await
            .unwrap();
        assert_eq!(actions.len(), Action::ALL.len());
        f.orch.set_on_record(&admin, dep.id, true).await.unwrap();
    }
}
