//! Collaborator traits consumed by the session engine.
//!
//! The engine never talks to a database, a video-room vendor, or a
//! notification channel directly. It records its decisions through
//! [`SessionStore`], provisions rooms through [`RoomProvider`], and
//! announces outcomes through [`EventSink`]. The two compare-and-swap
//! methods are the concurrency-control primitives: concurrent writers
//! race on them and exactly one wins.

use async_trait::async_trait;
use serde::Serialize;

use crate::action::ResourceType;
use crate::breakout::{BreakRoom, NewBreakRoom};
use crate::catalog::Role;
use crate::deposition::{Deposition, DepositionStatus, NewDeposition};
use crate::error::CoreResult;
use crate::event::{DepositionEvent, NewDepositionEvent};
use crate::participant::{AdmissionStatus, NewParticipant, Participant};
use crate::types::{DbId, Timestamp};

/// One `(user, resource) -> role` grant.
#[derive(Debug, Clone, Serialize)]
pub struct RoleAssignment {
    pub id: DbId,
    pub user_id: DbId,
    pub resource_type: ResourceType,
    pub resource_id: DbId,
    pub role: Role,
    pub created_at: Timestamp,
}

/// Durable state behind the engine. One implementation per backing
/// store; `MemoryStore` in this crate for tests, `PgSessionStore` in
/// `depo-db` for production.
#[async_trait]
pub trait SessionStore: Send + Sync {
    // -- Depositions --

    async fn insert_deposition(&self, new: NewDeposition) -> CoreResult<Deposition>;
    async fn load_deposition(&self, id: DbId) -> CoreResult<Deposition>;
    async fn save_deposition(&self, deposition: &Deposition) -> CoreResult<()>;

    /// Atomically move `status` from `expected` to `next`. Returns
    /// `false` (without writing) when the stored status no longer
    /// matches `expected` — the caller lost a race.
    async fn compare_and_swap_status(
        &self,
        id: DbId,
        expected: DepositionStatus,
        next: DepositionStatus,
    ) -> CoreResult<bool>;

    // -- Participants --

    async fn insert_participant(&self, new: NewParticipant) -> CoreResult<Participant>;
    async fn load_participant(&self, id: DbId) -> CoreResult<Participant>;
    async fn save_participant(&self, participant: &Participant) -> CoreResult<()>;

    /// Atomically decide a `Pending` participant. Returns `false` when
    /// the participant was no longer pending (a concurrent admitter got
    /// there first).
    async fn decide_admission(
        &self,
        participant_id: DbId,
        next: AdmissionStatus,
    ) -> CoreResult<bool>;

    async fn list_pending(&self, deposition_id: DbId) -> CoreResult<Vec<Participant>>;

    // -- Role assignments --

    async fn find_role_assignment(
        &self,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<Option<Role>>;

    /// Insert or replace the single role a user holds on a resource.
    async fn upsert_role_assignment(
        &self,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
        role: Role,
    ) -> CoreResult<()>;

    async fn list_role_assignments(
        &self,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<Vec<RoleAssignment>>;

    /// Rewrite every attendee-tier assignment on a deposition to
    /// `CompletedAttendee` as one change-set: a failure leaves either
    /// all or none of them demoted.
    async fn demote_session_roles(&self, deposition_id: DbId) -> CoreResult<()>;

    // -- Break rooms --

    async fn insert_break_room(&self, new: NewBreakRoom) -> CoreResult<BreakRoom>;
    async fn load_break_room(&self, id: DbId) -> CoreResult<BreakRoom>;
    async fn save_break_room(&self, room: &BreakRoom) -> CoreResult<()>;
    async fn add_break_room_member(&self, room_id: DbId, participant_id: DbId) -> CoreResult<()>;
    async fn remove_break_room_member(
        &self,
        room_id: DbId,
        participant_id: DbId,
    ) -> CoreResult<()>;
    async fn list_break_rooms(&self, deposition_id: DbId) -> CoreResult<Vec<BreakRoom>>;

    // -- Activity timeline --

    async fn append_event(&self, event: NewDepositionEvent) -> CoreResult<DepositionEvent>;
    async fn list_events(&self, deposition_id: DbId) -> CoreResult<Vec<DepositionEvent>>;
}

/// External video-room vendor. Room references are opaque strings.
#[async_trait]
pub trait RoomProvider: Send + Sync {
    async fn create_room(&self, name: &str) -> CoreResult<String>;
    async fn close_room(&self, room_ref: &str) -> CoreResult<()>;
}

/// Fire-and-forget notification fan-out. The engine does not await
/// delivery; a sink that drops events is acceptable.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: &DepositionEvent);
}
