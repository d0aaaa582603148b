//! Deposition event row model.

use depo_core::error::{CoreError, CoreResult};
use depo_core::event::{DepositionEvent, EventKind};
use depo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `deposition_events` table.
#[derive(Debug, Clone, FromRow)]
pub struct DepositionEventRow {
    pub id: DbId,
    pub deposition_id: DbId,
    pub kind: String,
    pub actor_user_id: Option<DbId>,
    pub detail: Option<String>,
    pub created_at: Timestamp,
}

impl DepositionEventRow {
    pub fn into_core(self) -> CoreResult<DepositionEvent> {
        let kind = EventKind::parse(&self.kind).ok_or_else(|| {
            CoreError::Internal(format!(
                "Deposition event {} has unknown kind '{}'",
                self.id, self.kind
            ))
        })?;
        Ok(DepositionEvent {
            id: self.id,
            deposition_id: self.deposition_id,
            kind,
            actor_user_id: self.actor_user_id,
            detail: self.detail,
            created_at: self.created_at,
        })
    }
}
