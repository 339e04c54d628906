use std::sync::Arc;

use garda_core::{AppResult, UserIdentity};
use garda_domain::{MenuKey, Permission, PermissionMask};

use crate::{AccessConfig, AccessRepository, SuperadminPolicy};

/// Menu-level permission checks for the acting user.
///
/// The effective mask for a menu is the bitwise OR across every active
/// assigned role's mapping for that menu. Superusers short-circuit to the
/// configured action mask; an unknown menu or an inactive role resolves to
/// the empty mask, which is a deny rather than an error.
#[derive(Clone)]
pub struct PermissionService {
    config: AccessConfig,
    policy: SuperadminPolicy,
    access_repository: Arc<dyn AccessRepository>,
}

impl PermissionService {
    /// Creates the service from configuration and a repository implementation.
    #[must_use]
    pub fn new(
        config: AccessConfig,
        policy: SuperadminPolicy,
        access_repository: Arc<dyn AccessRepository>,
    ) -> Self {
        Self {
            config,
            policy,
            access_repository,
        }
    }

    /// Returns whether the user bypasses role mappings entirely.
    #[must_use]
    pub fn is_superuser(&self, user: &UserIdentity) -> bool {
        self.policy.is_superadmin(Some(user)) || self.config.superuser_ids.contains(&user.user_id())
    }

    /// Resolves the effective mask for the first alias that maps to a menu.
    pub async fn action_for_menu(
        &self,
        actor: &UserIdentity,
        aliases: &[MenuKey],
    ) -> AppResult<PermissionMask> {
        if self.is_superuser(actor) {
            return Ok(self.config.superuser_action_mask);
        }

        let Some(menu) = self.resolve_first_alias(aliases).await? else {
            return Ok(PermissionMask::EMPTY);
        };

        let roles = self
            .access_repository
            .list_roles_for_user(actor.user_id())
            .await?;

        let mask = roles
            .iter()
            .filter(|role| role.is_active)
            .map(|role| role.mask_for(&menu))
            .fold(PermissionMask::EMPTY, |aggregate, mask| aggregate | mask);

        Ok(mask)
    }

    /// Returns whether the user holds the permission on any of the aliases.
    pub async fn can(
        &self,
        actor: &UserIdentity,
        aliases: &[MenuKey],
        permission: Permission,
    ) -> AppResult<bool> {
        let mask = self.action_for_menu(actor, aliases).await?;
        Ok(mask.has(permission))
    }

    /// Single-alias variant of [`PermissionService::can`] for CRUD screens.
    pub async fn can_crud(
        &self,
        actor: &UserIdentity,
        menu: &MenuKey,
        permission: Permission,
    ) -> AppResult<bool> {
        self.can(actor, std::slice::from_ref(menu), permission).await
    }

    async fn resolve_first_alias(&self, aliases: &[MenuKey]) -> AppResult<Option<MenuKey>> {
        for alias in aliases {
            if let Some(menu) = self.access_repository.resolve_menu(alias).await? {
                return Ok(Some(menu));
            }
        }

        Ok(None)
    }
}
