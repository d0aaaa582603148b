//! Resource-scoped permission resolution.
//!
//! `resolve` is a pure read: global admins get the full catalog set
//! without an assignment lookup; everyone else gets the catalog actions
//! of their single assignment on the resource, or the empty set when no
//! assignment exists (implicit deny). Safe to call concurrently and
//! repeatedly; consulted before every mutation in the engine.

use std::collections::HashSet;
use std::sync::Arc;

use crate::action::{Action, ResourceType};
use crate::catalog::PermissionCatalog;
use crate::error::{CoreError, CoreResult};
use crate::store::SessionStore;
use crate::types::DbId;

/// The authenticated principal behind a request.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: DbId,
    pub is_global_admin: bool,
}

/// Resolves effective action sets from the catalog and the assignment
/// store. Performs no mutation.
pub struct PermissionEngine {
    catalog: Arc<PermissionCatalog>,
    store: Arc<dyn SessionStore>,
}

impl PermissionEngine {
    pub fn new(catalog: Arc<PermissionCatalog>, store: Arc<dyn SessionStore>) -> Self {
        Self { catalog, store }
    }

    /// The effective action set for `actor` on one resource instance.
    pub async fn resolve(
        &self,
        actor: &Actor,
        resource_type: ResourceType,
        resource_id: DbId,
    ) -> CoreResult<HashSet<Action>> {
        if actor.is_global_admin {
            return Ok(self.catalog.full_set());
        }
        let role = self
            .store
            .find_role_assignment(actor.user_id, resource_type, resource_id)
            .await?;
        Ok(match role {
            Some(role) => self.catalog.actions_for(role),
            None => HashSet::new(),
        })
    }

    /// `Ok(())` when `action` is in the resolved set, `Forbidden`
    /// otherwise.
    pub async fn authorize(
        &self,
        actor: &Actor,
        resource_type: ResourceType,
        resource_id: DbId,
        action: Action,
    ) -> CoreResult<()> {
        let actions = self.resolve(actor, resource_type, resource_id).await?;
        if actions.contains(&action) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = actor.user_id,
                resource_type = resource_type.as_str(),
                resource_id,
                action = action.as_str(),
                "permission denied"
            );
            Err(CoreError::Forbidden(format!(
                "Action '{}' is not permitted on {} {}",
                action.as_str(),
                resource_type.as_str(),
                resource_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Role;
    use crate::memory::MemoryStore;

    fn engine(store: Arc<MemoryStore>) -> PermissionEngine {
        PermissionEngine::new(Arc::new(PermissionCatalog::seed()), store)
    }

    #[tokio::test]
    async fn global_admin_gets_full_set_without_assignments() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(store);
        let admin = Actor {
            user_id: 1,
            is_global_admin: true,
        };

        let actions = engine
            .resolve(&admin, ResourceType::Deposition, 99)
            .await
            .unwrap();
        assert_eq!(actions, PermissionCatalog::seed().full_set());
    }

    #[tokio::test]
    async fn no_assignment_is_implicit_deny() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(store);
        let user = Actor {
            user_id: 2,
            is_global_admin: false,
        };

        let actions = engine
            .resolve(&user, ResourceType::Deposition, 99)
            .await
            .unwrap();
        assert!(actions.is_empty());

        let err = engine
            .authorize(&user, ResourceType::Deposition, 99, Action::View)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn assignment_grants_catalog_actions() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_role_assignment(3, ResourceType::Deposition, 7, Role::CourtReporter)
            .await
            .unwrap();
        let engine = engine(store);
        let reporter = Actor {
            user_id: 3,
            is_global_admin: false,
        };

        engine
            .authorize(&reporter, ResourceType::Deposition, 7, Action::OnRecord)
            .await
            .unwrap();
        let err = engine
            .authorize(&reporter, ResourceType::Deposition, 7, Action::Delete)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn assignment_is_scoped_to_the_resource_instance() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_role_assignment(3, ResourceType::Deposition, 7, Role::DepositionAdmin)
            .await
            .unwrap();
        let engine = engine(store);
        let user = Actor {
            user_id: 3,
            is_global_admin: false,
        };

        let other = engine
            .resolve(&user, ResourceType::Deposition, 8)
            .await
            .unwrap();
        assert!(other.is_empty());
    }
}
