//! In-memory implementations of the collaborator traits.
//!
//! [`MemoryStore`] backs the engine's unit tests and local development
//! without a database. All state sits behind a single `Mutex`, which
//! makes the two compare-and-swap methods trivially linearizable. Lock
//! scope never spans an await point.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::action::ResourceType;
use crate::breakout::{BreakRoom, NewBreakRoom};
use crate::catalog::Role;
use crate::deposition::{Deposition, DepositionStatus, NewDeposition};
use crate::error::{CoreError, CoreResult};
use crate::event::{DepositionEvent, NewDepositionEvent};
use crate::participant::{AdmissionStatus, NewParticipant, Participant};
use crate::store::{EventSink, RoleAssignment, RoomProvider, SessionStore};
use crate::types::DbId;

#[derive(Default)]
struct Inner {
    next_id: DbId,
    depositions: HashMap<DbId, Deposition>,
    participants: HashMap<DbId, Participant>,
    assignments: HashMap<(DbId, ResourceType, DbId), RoleAssignment>,
    break_rooms: HashMap<DbId, BreakRoom>,
    events: Vec<DepositionEvent>,
}

impl Inner {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`SessionStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panicked test; propagate the panic.
        self.inner.lock().expect("MemoryStore lock poisoned")
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_deposition(&self, new: NewDeposition) -> CoreResult<Deposition> {
        let mut inner = self.lock();
        let now = chrono::Utc::now();
        let deposition = Deposition {
            id: inner.next_id(),
            case_id: new.case_id,
            requester_id: new.requester_id,
            added_by_id: new.added_by_id,
            room_ref: None,
            waiting_room_ref: None,
            shared_document_id: new.shared_document_id,
            status: DepositionStatus::Scheduled,
            on_the_record: false,
            scheduled_start: new.scheduled_start,
            scheduled_end: new.scheduled_end,
            complete_date: None,
            details: new.details,
            video_recording_required: new.video_recording_required,
            created_at: now,
            updated_at: now,
        };
        inner.depositions.insert(deposition.id, deposition.clone());
        Ok(deposition)
    }

    async fn load_deposition(&self, id: DbId) -> CoreResult<Deposition> {
        self.lock()
            .depositions
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Deposition",
                id,
            })
    }

    async fn save_deposition(&self, deposition: &Deposition) -> CoreResult<()> {
        let mut inner = self.lock();
        if !inner.depositions.contains_key(&deposition.id) {
            return Err(CoreError::NotFound {
                entity: "Deposition",
                id: deposition.id,
            });
        }
        let mut updated = deposition.clone();
        updated.updated_at = chrono::Utc::now();
        inner.depositions.insert(updated.id, updated);
        Ok(())
    }

    async fn compare_and_swap_status(
        &self,
        id: DbId,
        expected: DepositionStatus,
        next: DepositionStatus,
    ) -> CoreResult<bool> {
        let mut inner = self.lock();
        let deposition = inner.depositions.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "Deposition",
            id,
        })?;
        if deposition.status != expected {
            return Ok(false);
        }
        deposition.status = next;
        deposition.updated_at = chrono::Utc::now();
        Ok(true)
    }

    async fn insert_participant(&self, new: NewParticipant) -> CoreResult<Participant> {
        let mut inner = self.lock();
        let participant = Participant {
            id: inner.next_id(),
            deposition_id: new.deposition_id,
            user_id: new.user_id,
            name: new.name,
            email: new.email,
            role: new.role,
            admission: AdmissionStatus::Pending,
            has_joined: false,
            muted: false,
            device_info: None,
            created_at: chrono::Utc::now(),
        };
        inner
            .participants
            .insert(participant.id, participant.clone());
        Ok(participant)
    }

    async fn load_participant(&self, id: DbId) -> CoreResult<Participant> {
        self.lock()
            .participants
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Participant",
                id,
            })
    }

    async fn save_participant(&self, participant: &Participant) -> CoreResult<()> {
        let mut inner = self.lock();
        if !inner.participants.contains_key(&participant.id) {
            return Err(CoreError::NotFound {
                entity: "Participant",
                id: participant.id,
            });
        }
        inner
            .participants
            .insert(participant.id, participant.clone());
        Ok(())
    }

    async fn decide_admission(
        &self,
        participant_id: DbId,
        next: AdmissionStatus,
    ) -> CoreResult<bool> {
        let mut inner = self.lock();
        let participant =
            inner
                .participants
                .get_mut(&participant_id)
                .ok_or(CoreError::NotFound {
                    entity: "Participant",
                    id: participant_id,
                })?;
        if participant.admission != AdmissionStatus::Pending {
            return Ok(false);
        }
        participant.admission = next;
        Ok(true)
    }

    async fn list_pending(&self, deposition_id: DbId) -> CoreResult<Vec<Participant>> {
        let inner = self.lock();
        let mut pending: Vec<_> = inner
            .participants
            .values()
            .filter(|p| {
                p.deposition_id == deposition_id
                    && p.admission == AdmissionStatus::Pending
                    && !p.has_joined
            })
            .cloned()
            .collect();
        pending.sort_by_key(|p| p.id);
        Ok(pending)
    }

    async fn find_role_assignment(
        &self,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<Option<Role>> {
        Ok(self
            .lock()
            .assignments
            .get(&(user_id, resource_type, resource_id))
            .map(|a| a.role))
    }

    async fn upsert_role_assignment(
        &self,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
        role: Role,
    ) -> CoreResult<()> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let key = (user_id, resource_type, resource_id);
        let assignment = match inner.assignments.get(&key) {
            Some(existing) => RoleAssignment {
                role,
                ..existing.clone()
            },
            None => RoleAssignment {
                id,
                user_id,
                resource_type,
                resource_id,
                role,
                created_at: chrono::Utc::now(),
            },
        };
        inner.assignments.insert(key, assignment);
        Ok(())
    }

    async fn list_role_assignments(
        &self,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<Vec<RoleAssignment>> {
        let inner = self.lock();
        let mut assignments: Vec<_> = inner
            .assignments
            .values()
            .filter(|a| a.resource_type == resource_type && a.resource_id == resource_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.id);
        Ok(assignments)
    }

    async fn demote_session_roles(&self, deposition_id: DbId) -> CoreResult<()> {
        // The whole change-set applies under one lock acquisition.
        let mut inner = self.lock();
        for assignment in inner.assignments.values_mut() {
            if assignment.resource_type == ResourceType::Deposition
                && assignment.resource_id == deposition_id
                && assignment.role.demotes_on_completion()
            {
                assignment.role = Role::CompletedAttendee;
            }
        }
        Ok(())
    }

    async fn insert_break_room(&self, new: NewBreakRoom) -> CoreResult<BreakRoom> {
        let mut inner = self.lock();
        let room = BreakRoom {
            id: inner.next_id(),
            deposition_id: new.deposition_id,
            room_ref: new.room_ref,
            name: new.name,
            locked: false,
            members: Vec::new(),
            created_at: chrono::Utc::now(),
        };
        inner.break_rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn load_break_room(&self, id: DbId) -> CoreResult<BreakRoom> {
        self.lock()
            .break_rooms
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "BreakRoom",
                id,
            })
    }

    async fn save_break_room(&self, room: &BreakRoom) -> CoreResult<()> {
        let mut inner = self.lock();
        if !inner.break_rooms.contains_key(&room.id) {
            return Err(CoreError::NotFound {
                entity: "BreakRoom",
                id: room.id,
            });
        }
        inner.break_rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn add_break_room_member(&self, room_id: DbId, participant_id: DbId) -> CoreResult<()> {
        let mut inner = self.lock();
        let room = inner
            .break_rooms
            .get_mut(&room_id)
            .ok_or(CoreError::NotFound {
                entity: "BreakRoom",
                id: room_id,
            })?;
        if !room.members.contains(&participant_id) {
            room.members.push(participant_id);
        }
        Ok(())
    }

    async fn remove_break_room_member(
        &self,
        room_id: DbId,
        participant_id: DbId,
    ) -> CoreResult<()> {
        let mut inner = self.lock();
        let room = inner
            .break_rooms
            .get_mut(&room_id)
            .ok_or(CoreError::NotFound {
                entity: "BreakRoom",
                id: room_id,
            })?;
        room.members.retain(|m| *m != participant_id);
        Ok(())
    }

    async fn list_break_rooms(&self, deposition_id: DbId) -> CoreResult<Vec<BreakRoom>> {
        let inner = self.lock();
        let mut rooms: Vec<_> = inner
            .break_rooms
            .values()
            .filter(|r| r.deposition_id == deposition_id)
            .cloned()
            .collect();
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }

    async fn append_event(&self, event: NewDepositionEvent) -> CoreResult<DepositionEvent> {
        let mut inner = self.lock();
        let entry = DepositionEvent {
            id: inner.next_id(),
            deposition_id: event.deposition_id,
            kind: event.kind,
            actor_user_id: event.actor_user_id,
            detail: event.detail,
            created_at: chrono::Utc::now(),
        };
        inner.events.push(entry.clone());
        Ok(entry)
    }

    async fn list_events(&self, deposition_id: DbId) -> CoreResult<Vec<DepositionEvent>> {
        Ok(self
            .lock()
            .events
            .iter()
            .filter(|e| e.deposition_id == deposition_id)
            .cloned()
            .collect())
    }
}

/// Room provider that mints sequential refs and records closures.
#[derive(Default)]
pub struct StubRoomProvider {
    counter: AtomicU64,
    closed: Mutex<Vec<String>>,
}

impl StubRoomProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Room refs closed so far, in closure order.
    pub fn closed_rooms(&self) -> Vec<String> {
        self.closed.lock().expect("StubRoomProvider lock").clone()
    }
}

#[async_trait]
impl RoomProvider for StubRoomProvider {
    async fn create_room(&self, name: &str) -> CoreResult<String> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("stub-room-{n}-{name}"))
    }

    async fn close_room(&self, room_ref: &str) -> CoreResult<()> {
        self.closed
            .lock()
            .expect("StubRoomProvider lock")
            .push(room_ref.to_string());
        Ok(())
    }
}

/// Sink that records every notified event, for assertions in tests.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DepositionEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DepositionEvent> {
        self.events.lock().expect("CollectingSink lock").clone()
    }
}

impl EventSink for CollectingSink {
    fn notify(&self, event: &DepositionEvent) {
        self.events
            .lock()
            .expect("CollectingSink lock")
            .push(event.clone());
    }
}

/// Sink that drops everything.
#[derive(Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&self, _event: &DepositionEvent) {}
}
