//! Repository for the `role_assignments` table.

use depo_core::action::ResourceType;
use depo_core::catalog::Role;
use depo_core::types::DbId;
use sqlx::PgPool;

use crate::models::RoleAssignmentRow;

const ASSIGNMENT_COLUMNS: &str = "\
    id, user_id, resource_type, resource_id, role, created_at";

pub struct RoleAssignmentRepo;

impl RoleAssignmentRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> Result<Option<RoleAssignmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM role_assignments \
             WHERE user_id = $1 AND resource_type = $2 AND resource_id = $3"
        );
        sqlx::query_as::<_, RoleAssignmentRow>(&query)
            .bind(user_id)
            .bind(resource_type.as_str())
            .bind(resource_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the single role a user holds on a resource.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        resource_type: ResourceType,
        resource_id: DbId,
        role: Role,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO role_assignments (user_id, resource_type, resource_id, role) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_role_assignments_user_resource \
             DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(user_id)
        .bind(resource_type.as_str())
        .bind(resource_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Rewrite every attendee-tier role on a deposition to
    /// `completed_attendee`. A single statement, so the demotion is
    /// atomic.
    pub async fn demote_session_roles(
        pool: &PgPool,
        deposition_id: DbId,
    ) -> Result<(), sqlx::Error> {
        let demoted: Vec<String> = Role::ALL
            .iter()
            .filter(|r| r.demotes_on_completion())
            .map(|r| r.as_str().to_string())
            .collect();
        sqlx::query(
            "UPDATE role_assignments SET role = $1 \
             WHERE resource_type = $2 AND resource_id = $3 AND role = ANY($4)",
        )
        .bind(Role::CompletedAttendee.as_str())
        .bind(ResourceType::Deposition.as_str())
        .bind(deposition_id)
        .bind(&demoted)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn list_for_resource(
        pool: &PgPool,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> Result<Vec<RoleAssignmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM role_assignments \
             WHERE resource_type = $1 AND resource_id = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, RoleAssignmentRow>(&query)
            .bind(resource_type.as_str())
            .bind(resource_id)
            .fetch_all(pool)
            .await
    }
}
