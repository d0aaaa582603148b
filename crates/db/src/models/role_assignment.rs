//! Role assignment row model.

use depo_core::action::ResourceType;
use depo_core::catalog::Role;
use depo_core::error::{CoreError, CoreResult};
use depo_core::store::RoleAssignment;
use depo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `role_assignments` table.
#[derive(Debug, Clone, FromRow)]
pub struct RoleAssignmentRow {
    pub id: DbId,
    pub user_id: DbId,
    pub resource_type: String,
    pub resource_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}

impl RoleAssignmentRow {
    pub fn into_core(self) -> CoreResult<RoleAssignment> {
        let resource_type = ResourceType::parse(&self.resource_type).ok_or_else(|| {
            CoreError::Internal(format!(
                "Role assignment {} has unknown resource type '{}'",
                self.id, self.resource_type
            ))
        })?;
        let role = Role::parse(&self.role).ok_or_else(|| {
            CoreError::Internal(format!(
                "Role assignment {} has unknown role '{}'",
                self.id, self.role
            ))
        })?;
        Ok(RoleAssignment {
            id: self.id,
            user_id: self.user_id,
            resource_type,
            resource_id: self.resource_id,
            role,
            created_at: self.created_at,
        })
    }
}
