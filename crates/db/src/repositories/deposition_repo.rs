//! Repository for the `depositions` table.

use depo_core::deposition::{Deposition, DepositionStatus, NewDeposition};
use depo_core::types::DbId;
use sqlx::PgPool;

use crate::models::DepositionRow;

const DEPOSITION_COLUMNS: &str = "\
    id, case_id, requester_id, added_by_id, room_ref, waiting_room_ref, \
    shared_document_id, status, on_the_record, scheduled_start, scheduled_end, \
    complete_date, details, video_recording_required, created_at, updated_at";

pub struct DepositionRepo;

impl DepositionRepo {
    /// Insert a new deposition in `scheduled` state.
    pub async fn insert(pool: &PgPool, new: &NewDeposition) -> Result<DepositionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO depositions \
                (case_id, requester_id, added_by_id, shared_document_id, \
                 scheduled_start, scheduled_end, details, video_recording_required) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {DEPOSITION_COLUMNS}"
        );
        sqlx::query_as::<_, DepositionRow>(&query)
            .bind(new.case_id)
            .bind(new.requester_id)
            .bind(new.added_by_id)
            .bind(new.shared_document_id)
            .bind(new.scheduled_start)
            .bind(new.scheduled_end)
            .bind(new.details.as_deref())
            .bind(new.video_recording_required)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DepositionRow>, sqlx::Error> {
        let query = format!("SELECT {DEPOSITION_COLUMNS} FROM depositions WHERE id = $1");
        sqlx::query_as::<_, DepositionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Full-row update of the mutable columns. The status column is NOT
    /// written here; status moves only through [`Self::compare_and_swap_status`].
    pub async fn update(pool: &PgPool, deposition: &Deposition) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE depositions SET \
                room_ref = $2, waiting_room_ref = $3, shared_document_id = $4, \
                on_the_record = $5, scheduled_start = $6, scheduled_end = $7, \
                complete_date = $8, details = $9, video_recording_required = $10, \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(deposition.id)
        .bind(deposition.room_ref.as_deref())
        .bind(deposition.waiting_room_ref.as_deref())
        .bind(deposition.shared_document_id)
        .bind(deposition.on_the_record)
        .bind(deposition.scheduled_start)
        .bind(deposition.scheduled_end)
        .bind(deposition.complete_date)
        .bind(deposition.details.as_deref())
        .bind(deposition.video_recording_required)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Guarded status write: succeeds only when the stored status still
    /// matches `expected`. Returns the number of rows written (0 or 1).
    pub async fn compare_and_swap_status(
        pool: &PgPool,
        id: DbId,
        expected: DepositionStatus,
        next: DepositionStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE depositions SET status = $3, updated_at = now() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
