//! sqlx-backed implementation of the core engine's `SessionStore`.

use async_trait::async_trait;
use depo_core::action::ResourceType;
use depo_core::breakout::{BreakRoom, NewBreakRoom};
use depo_core::catalog::Role;
use depo_core::deposition::{Deposition, DepositionStatus, NewDeposition};
use depo_core::error::{CoreError, CoreResult};
use depo_core::event::{DepositionEvent, NewDepositionEvent};
use depo_core::participant::{AdmissionStatus, NewParticipant, Participant};
use depo_core::store::{RoleAssignment, SessionStore};
use depo_core::types::DbId;

use crate::repositories::{
    BreakRoomRepo, DepositionRepo, EventRepo, ParticipantRepo, RoleAssignmentRepo,
};
use crate::DbPool;

/// PostgreSQL session store. Cheap to clone; wraps the shared pool.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error onto the core taxonomy. Database failures are
/// internal errors as far as the engine is concerned.
fn db_err(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "database error");
    CoreError::Internal(format!("Database error: {err}"))
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert_deposition(&self, new: NewDeposition) -> CoreResult<Deposition> {
        DepositionRepo::insert(&self.pool, &new)
            .await
            .map_err(db_err)?
            .into_core()
    }

    async fn load_deposition(&self, id: DbId) -> CoreResult<Deposition> {
        DepositionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_err)?
            .ok_or(CoreError::NotFound {
                entity: "Deposition",
                id,
            })?
            .into_core()
    }

    async fn save_deposition(&self, deposition: &Deposition) -> CoreResult<()> {
        let written = DepositionRepo::update(&self.pool, deposition)
            .await
            .map_err(db_err)?;
        if written == 0 {
            return Err(CoreError::NotFound {
                entity: "Deposition",
                id: deposition.id,
            });
        }
        Ok(())
    }

    async fn compare_and_swap_status(
        &self,
        id: DbId,
        expected: DepositionStatus,
        next: DepositionStatus,
    ) -> CoreResult<bool> {
        let written = DepositionRepo::compare_and_swap_status(&self.pool, id, expected, next)
            .await
            .map_err(db_err)?;
        Ok(written == 1)
    }

    async fn insert_participant(&self, new: NewParticipant) -> CoreResult<Participant> {
        ParticipantRepo::insert(&self.pool, &new)
            .await
            .map_err(db_err)?
            .into_core()
    }

    async fn load_participant(&self, id: DbId) -> CoreResult<Participant> {
        ParticipantRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_err)?
            .ok_or(CoreError::NotFound {
                entity: "Participant",
                id,
            })?
            .into_core()
    }

    async fn save_participant(&self, participant: &Participant) -> CoreResult<()> {
        let written = ParticipantRepo::update(&self.pool, participant)
            .await
            .map_err(db_err)?;
        if written == 0 {
            return Err(CoreError::NotFound {
                entity: "Participant",
                id: participant.id,
            });
        }
        Ok(())
    }

    async fn decide_admission(
        &self,
        participant_id: DbId,
        next: AdmissionStatus,
    ) -> CoreResult<bool> {
        let written = ParticipantRepo::decide_admission(&self.pool, participant_id, next)
            .await
            .map_err(db_err)?;
        Ok(written == 1)
    }

    async fn list_pending(&self, deposition_id: DbId) -> CoreResult<Vec<Participant>> {
        ParticipantRepo::list_pending(&self.pool, deposition_id)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|row| row.into_core())
            .collect()
    }

    async fn find_role_assignment(
        &self,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<Option<Role>> {
        let row = RoleAssignmentRepo::find(&self.pool, user_id, resource_type, resource_id)
            .await
            .map_err(db_err)?;
        match row {
            Some(row) => Ok(Some(row.into_core()?.role)),
            None => Ok(None),
        }
    }

    async fn upsert_role_assignment(
        &self,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
        role: Role,
    ) -> CoreResult<()> {
        RoleAssignmentRepo::upsert(&self.pool, user_id, resource_type, resource_id, role)
            .await
            .map_err(db_err)
    }

    async fn list_role_assignments(
        &self,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<Vec<RoleAssignment>> {
        RoleAssignmentRepo::list_for_resource(&self.pool, resource_type, resource_id)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|row| row.into_core())
            .collect()
    }

    async fn demote_session_roles(&self, deposition_id: DbId) -> CoreResult<()> {
        RoleAssignmentRepo::demote_session_roles(&self.pool, deposition_id)
            .await
            .map_err(db_err)
    }

    async fn insert_break_room(&self, new: NewBreakRoom) -> CoreResult<BreakRoom> {
        let row = BreakRoomRepo::insert(&self.pool, &new)
            .await
            .map_err(db_err)?;
        Ok(row.into_core(Vec::new()))
    }

    async fn load_break_room(&self, id: DbId) -> CoreResult<BreakRoom> {
        let row = BreakRoomRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_err)?
            .ok_or(CoreError::NotFound {
                entity: "BreakRoom",
                id,
            })?;
        let members = BreakRoomRepo::list_members(&self.pool, id)
            .await
            .map_err(db_err)?;
        Ok(row.into_core(members))
    }

    async fn save_break_room(&self, room: &BreakRoom) -> CoreResult<()> {
        let written = BreakRoomRepo::update(&self.pool, room)
            .await
            .map_err(db_err)?;
        if written == 0 {
            return Err(CoreError::NotFound {
                entity: "BreakRoom",
                id: room.id,
            });
        }
        Ok(())
    }

    async fn add_break_room_member(&self, room_id: DbId, participant_id: DbId) -> CoreResult<()> {
        BreakRoomRepo::add_member(&self.pool, room_id, participant_id)
            .await
            .map_err(db_err)
    }

    async fn remove_break_room_member(
        &self,
        room_id: DbId,
        participant_id: DbId,
    ) -> CoreResult<()> {
        BreakRoomRepo::remove_member(&self.pool, room_id, participant_id)
            .await
            .map_err(db_err)
    }

    async fn list_break_rooms(&self, deposition_id: DbId) -> CoreResult<Vec<BreakRoom>> {
        let rows = BreakRoomRepo::list_for_deposition(&self.pool, deposition_id)
            .await
            .map_err(db_err)?;
        let mut rooms = Vec::with_capacity(rows.len());
        for row in rows {
            let members = BreakRoomRepo::list_members(&self.pool, row.id)
                .await
                .map_err(db_err)?;
            rooms.push(row.into_core(members));
        }
        Ok(rooms)
    }

    async fn append_event(&self, event: NewDepositionEvent) -> CoreResult<DepositionEvent> {
        EventRepo::append(&self.pool, &event)
            .await
            .map_err(db_err)?
            .into_core()
    }

    async fn list_events(&self, deposition_id: DbId) -> CoreResult<Vec<DepositionEvent>> {
        EventRepo::list_for_deposition(&self.pool, deposition_id)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|row| row.into_core())
            .collect()
    }
}
