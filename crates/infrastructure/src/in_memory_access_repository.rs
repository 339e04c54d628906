use std::collections::HashMap;

use async_trait::async_trait;
use garda_application::AccessRepository;
use garda_core::{AppError, AppResult, UserId};
use garda_domain::{MenuDefinition, MenuKey, Role, RoleId};
use tokio::sync::RwLock;

/// In-memory menu, role, and assignment store.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    menus: RwLock<HashMap<MenuKey, MenuKey>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    assignments: RwLock<Vec<(UserId, RoleId)>>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a menu and every alias under its canonical key.
    pub async fn register_menu(&self, definition: MenuDefinition) -> AppResult<()> {
        let mut menus = self.menus.write().await;

        if menus.contains_key(&definition.key) {
            return Err(AppError::Conflict(format!(
                "menu '{}' is already registered",
                definition.key
            )));
        }

        menus.insert(definition.key.clone(), definition.key.clone());
        for alias in definition.aliases {
            menus.insert(alias, definition.key.clone());
        }

        Ok(())
    }

    /// Stores or replaces a role definition.
    pub async fn upsert_role(&self, role: Role) {
        self.roles.write().await.insert(role.id, role);
    }

    /// Assigns a role to a user; a user may hold several assignments.
    pub async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        if !self.roles.read().await.contains_key(&role_id) {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }

        self.assignments.write().await.push((user_id, role_id));
        Ok(())
    }
}

#[async_trait]
impl AccessRepository for InMemoryAccessRepository {
    async fn resolve_menu(&self, key: &MenuKey) -> AppResult<Option<MenuKey>> {
        Ok(self.menus.read().await.get(key).cloned())
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let assignments = self.assignments.read().await;
        let roles = self.roles.read().await;

        Ok(assignments
            .iter()
            .filter(|(assigned_user, _)| *assigned_user == user_id)
            .filter_map(|(_, role_id)| roles.get(role_id).cloned())
            .collect())
    }
}
