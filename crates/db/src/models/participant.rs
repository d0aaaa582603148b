//! Participant row model.

use depo_core::catalog::Role;
use depo_core::error::{CoreError, CoreResult};
use depo_core::participant::{AdmissionStatus, Participant};
use depo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `participants` table.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub id: DbId,
    pub deposition_id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub admission: String,
    pub has_joined: bool,
    pub muted: bool,
    pub device_info: Option<String>,
    pub created_at: Timestamp,
}

impl ParticipantRow {
    pub fn into_core(self) -> CoreResult<Participant> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            CoreError::Internal(format!(
                "Participant {} has unknown role '{}'",
                self.id, self.role
            ))
        })?;
        let admission = AdmissionStatus::parse(&self.admission).ok_or_else(|| {
            CoreError::Internal(format!(
                "Participant {} has unknown admission state '{}'",
                self.id, self.admission
            ))
        })?;
        Ok(Participant {
            id: self.id,
            deposition_id: self.deposition_id,
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            role,
            admission,
            has_joined: self.has_joined,
            muted: self.muted,
            device_info: self.device_info,
            created_at: self.created_at,
        })
    }
}
