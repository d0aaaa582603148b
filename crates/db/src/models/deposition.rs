//! Deposition row model.

use depo_core::deposition::{Deposition, DepositionStatus};
use depo_core::error::{CoreError, CoreResult};
use depo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `depositions` table.
#[derive(Debug, Clone, FromRow)]
pub struct DepositionRow {
    pub id: DbId,
    pub case_id: DbId,
    pub requester_id: DbId,
    pub added_by_id: DbId,
    pub room_ref: Option<String>,
    pub waiting_room_ref: Option<String>,
    pub shared_document_id: Option<DbId>,
    pub status: String,
    pub on_the_record: bool,
    pub scheduled_start: Timestamp,
    pub scheduled_end: Option<Timestamp>,
    pub complete_date: Option<Timestamp>,
    pub details: Option<String>,
    pub video_recording_required: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DepositionRow {
    pub fn into_core(self) -> CoreResult<Deposition> {
        let status = DepositionStatus::parse(&self.status).ok_or_else(|| {
            CoreError::Internal(format!(
                "Deposition {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;
        Ok(Deposition {
            id: self.id,
            case_id: self.case_id,
            requester_id: self.requester_id,
            added_by_id: self.added_by_id,
            room_ref: self.room_ref,
            waiting_room_ref: self.waiting_room_ref,
            shared_document_id: self.shared_document_id,
            status,
            on_the_record: self.on_the_record,
            scheduled_start: self.scheduled_start,
            scheduled_end: self.scheduled_end,
            complete_date: self.complete_date,
            details: self.details,
            video_recording_required: self.video_recording_required,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
