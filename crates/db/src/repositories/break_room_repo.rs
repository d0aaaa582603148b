//! Repository for the `break_rooms` and `break_room_members` tables.

use depo_core::breakout::{BreakRoom, NewBreakRoom};
use depo_core::types::DbId;
use sqlx::PgPool;

use crate::models::BreakRoomRow;

const BREAK_ROOM_COLUMNS: &str = "\
    id, deposition_id, room_ref, name, locked, created_at";

pub struct BreakRoomRepo;

impl BreakRoomRepo {
    pub async fn insert(pool: &PgPool, new: &NewBreakRoom) -> Result<BreakRoomRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO break_rooms (deposition_id, room_ref, name) \
             VALUES ($1, $2, $3) \
             RETURNING {BREAK_ROOM_COLUMNS}"
        );
        sqlx::query_as::<_, BreakRoomRow>(&query)
            .bind(new.deposition_id)
            .bind(&new.room_ref)
            .bind(&new.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BreakRoomRow>, sqlx::Error> {
        let query = format!("SELECT {BREAK_ROOM_COLUMNS} FROM break_rooms WHERE id = $1");
        sqlx::query_as::<_, BreakRoomRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(pool: &PgPool, room: &BreakRoom) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE break_rooms SET name = $2, locked = $3 WHERE id = $1")
            .bind(room.id)
            .bind(&room.name)
            .bind(room.locked)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_for_deposition(
        pool: &PgPool,
        deposition_id: DbId,
    ) -> Result<Vec<BreakRoomRow>, sqlx::Error> {
        let query = format!(
            "SELECT {BREAK_ROOM_COLUMNS} FROM break_rooms \
             WHERE deposition_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, BreakRoomRow>(&query)
            .bind(deposition_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_members(pool: &PgPool, room_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT participant_id FROM break_room_members \
             WHERE break_room_id = $1 ORDER BY participant_id",
        )
        .bind(room_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn add_member(
        pool: &PgPool,
        room_id: DbId,
        participant_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO break_room_members (break_room_id, participant_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(room_id)
        .bind(participant_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn remove_member(
        pool: &PgPool,
        room_id: DbId,
        participant_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM break_room_members \
             WHERE break_room_id = $1 AND participant_id = $2",
        )
        .bind(room_id)
        .bind(participant_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
