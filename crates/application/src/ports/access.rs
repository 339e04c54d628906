use async_trait::async_trait;
use garda_core::{AppResult, UserId};
use garda_domain::{MenuKey, Role};

/// Repository port for menu and role lookups.
#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// Resolves a menu key or any registered alias to the canonical key.
    ///
    /// Returns `None` when the key addresses no known resource; callers
    /// treat that as deny-by-default, never as an error.
    async fn resolve_menu(&self, key: &MenuKey) -> AppResult<Option<MenuKey>>;

    /// Lists every role assigned to the user, active or not.
    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>>;
}
