//! Repository for the `deposition_events` table. Append-only: no
//! update or delete methods exist.

use depo_core::event::NewDepositionEvent;
use depo_core::types::DbId;
use sqlx::PgPool;

use crate::models::DepositionEventRow;

const EVENT_COLUMNS: &str = "\
    id, deposition_id, kind, actor_user_id, detail, created_at";

pub struct EventRepo;

impl EventRepo {
    pub async fn append(
        pool: &PgPool,
        event: &NewDepositionEvent,
    ) -> Result<DepositionEventRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO deposition_events (deposition_id, kind, actor_user_id, detail) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, DepositionEventRow>(&query)
            .bind(event.deposition_id)
            .bind(event.kind.as_str())
            .bind(event.actor_user_id)
            .bind(event.detail.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_deposition(
        pool: &PgPool,
        deposition_id: DbId,
    ) -> Result<Vec<DepositionEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM deposition_events \
             WHERE deposition_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, DepositionEventRow>(&query)
            .bind(deposition_id)
            .fetch_all(pool)
            .await
    }
}
