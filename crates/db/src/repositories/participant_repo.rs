//! Repository for the `participants` table.

use depo_core::participant::{AdmissionStatus, NewParticipant, Participant};
use depo_core::types::DbId;
use sqlx::PgPool;

use crate::models::ParticipantRow;

const PARTICIPANT_COLUMNS: &str = "\
    id, deposition_id, user_id, name, email, role, admission, has_joined, \
    muted, device_info, created_at";

pub struct ParticipantRepo;

impl ParticipantRepo {
    pub async fn insert(
        pool: &PgPool,
        new: &NewParticipant,
    ) -> Result<ParticipantRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO participants (deposition_id, user_id, name, email, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PARTICIPANT_COLUMNS}"
        );
        sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(new.deposition_id)
            .bind(new.user_id)
            .bind(&new.name)
            .bind(new.email.as_deref())
            .bind(new.role.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ParticipantRow>, sqlx::Error> {
        let query = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1");
        sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(pool: &PgPool, participant: &Participant) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE participants SET \
                user_id = $2, name = $3, email = $4, role = $5, admission = $6, \
                has_joined = $7, muted = $8, device_info = $9 \
             WHERE id = $1",
        )
        .bind(participant.id)
        .bind(participant.user_id)
        .bind(&participant.name)
        .bind(participant.email.as_deref())
        .bind(participant.role.as_str())
        .bind(participant.admission.as_str())
        .bind(participant.has_joined)
        .bind(participant.muted)
        .bind(participant.device_info.as_deref())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Guarded admission write: only a `pending` participant can be
    /// decided. Returns the number of rows written (0 or 1); 0 means a
    /// concurrent admitter decided first.
    pub async fn decide_admission(
        pool: &PgPool,
        id: DbId,
        next: AdmissionStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE participants SET admission = $2 \
             WHERE id = $1 AND admission = 'pending'",
        )
        .bind(id)
        .bind(next.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// The waiting-room queue for one deposition, in request order.
    pub async fn list_pending(
        pool: &PgPool,
        deposition_id: DbId,
    ) -> Result<Vec<ParticipantRow>, sqlx::Error> {
        let query = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants \
             WHERE deposition_id = $1 AND admission = 'pending' AND has_joined = FALSE \
             ORDER BY id"
        );
        sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(deposition_id)
            .fetch_all(pool)
            .await
    }
}
