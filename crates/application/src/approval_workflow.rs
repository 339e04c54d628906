use std::sync::Arc;

use garda_core::{AppResult, OrgPrefix, UserId, UserIdentity};
use garda_domain::{MenuKey, Permission, Risk, RiskStatus, RoleType};
use serde::{Deserialize, Serialize};

use crate::{AccessRepository, PermissionService, RiskQuery, RiskScope, SuperadminPolicy};

/// Acting-user classification computed per evaluation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowContext {
    /// Derived role-type classification.
    pub role_type: RoleType,
    /// Identity-allowlist or role-driven superadmin.
    pub is_superadmin: bool,
    /// Acting user id.
    pub user_id: UserId,
    /// Organizational unit of the acting user, when the directory holds one.
    pub org_prefix: Option<OrgPrefix>,
}

/// Navigation path a record view request arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOrigin {
    /// Regular register navigation.
    Direct,
    /// Cross-navigation from the approval list.
    ApprovalList,
}

/// Outcome of a record-level capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAccess {
    /// Neither authorization path grants the record.
    Denied,
    /// Granted through the register's own read permission and scope.
    AllowedDirect,
    /// Granted through the approval-list read permission and scope.
    AllowedViaApproval,
}

impl RecordAccess {
    /// Returns whether either authorization path granted the record.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Role-type and organization scoping for the approval workflow.
///
/// Scope values produced here are mandatory filters: repositories apply them
/// inside the data-access layer, and record-level checks test rows against
/// the same query they would be listed under.
#[derive(Clone)]
pub struct ApprovalWorkflow {
    policy: SuperadminPolicy,
    permissions: PermissionService,
    access_repository: Arc<dyn AccessRepository>,
}

impl ApprovalWorkflow {
    /// Creates the workflow from the policy and permission collaborators.
    #[must_use]
    pub fn new(
        policy: SuperadminPolicy,
        permissions: PermissionService,
        access_repository: Arc<dyn AccessRepository>,
    ) -> Self {
        Self {
            policy,
            permissions,
            access_repository,
        }
    }

    /// Computes the acting user's classification and organizational scope.
    pub async fn context(&self, actor: &UserIdentity) -> AppResult<WorkflowContext> {
        let roles = self
            .access_repository
            .list_roles_for_user(actor.user_id())
            .await?;

        let role_superadmin = roles
            .iter()
            .any(|role| role.is_active && role.is_superadmin_role());

        Ok(WorkflowContext {
            role_type: RoleType::classify(roles.iter()),
            is_superadmin: self.policy.is_superadmin(Some(actor)) || role_superadmin,
            user_id: actor.user_id(),
            org_prefix: actor.org_prefix().cloned(),
        })
    }

    /// Narrows a register query to the rows the context may see.
    pub fn apply_risk_register_scope(&self, context: &WorkflowContext, query: &mut RiskQuery) {
        query.scope = self.register_scope(context);
    }

    /// Narrows an approval-list query; only submitted rows await a decision.
    pub fn apply_approval_list_scope(&self, context: &WorkflowContext, query: &mut RiskQuery) {
        query.scope = self.register_scope(context);
        query.status = Some(RiskStatus::Submitted);
    }

    /// Builds a register query narrowed for the context.
    #[must_use]
    pub fn register_query(&self, context: &WorkflowContext) -> RiskQuery {
        let mut query = RiskQuery::unrestricted();
        self.apply_risk_register_scope(context, &mut query);
        query
    }

    /// Builds an approval-list query narrowed for the context.
    #[must_use]
    pub fn approval_query(&self, context: &WorkflowContext) -> RiskQuery {
        let mut query = RiskQuery::unrestricted();
        self.apply_approval_list_scope(context, &mut query);
        query
    }

    /// Returns whether the user may decide approvals behind the aliases.
    pub async fn can_approve(
        &self,
        actor: &UserIdentity,
        aliases: &[MenuKey],
    ) -> AppResult<bool> {
        let context = self.context(actor).await?;
        if context.is_superadmin {
            return Ok(true);
        }

        self.permissions.can(actor, aliases, Permission::Approve).await
    }

    /// Record-level capability check for viewing one risk row.
    ///
    /// The client-supplied origin selects the approval path only when both
    /// of its preconditions hold: the approval list grants read access, and
    /// the row is inside the approval-scoped query result set.
    pub async fn risk_record_access(
        &self,
        actor: &UserIdentity,
        risk: &Risk,
        origin: AccessOrigin,
    ) -> AppResult<RecordAccess> {
        let context = self.context(actor).await?;
        let register_menu = MenuKey::new(MenuKey::RISK_REGISTER)?;

        let direct_read = self
            .permissions
            .can_crud(actor, &register_menu, Permission::Read)
            .await?;
        if direct_read && self.register_query(&context).matches(risk) {
            return Ok(RecordAccess::AllowedDirect);
        }

        if origin == AccessOrigin::ApprovalList {
            let approval_menu = MenuKey::new(MenuKey::RISK_APPROVAL)?;
            let approval_read = self
                .permissions
                .can_crud(actor, &approval_menu, Permission::Read)
                .await?;
            if approval_read && self.approval_query(&context).matches(risk) {
                return Ok(RecordAccess::AllowedViaApproval);
            }
        }

        Ok(RecordAccess::Denied)
    }

    fn register_scope(&self, context: &WorkflowContext) -> RiskScope {
        if context.is_superadmin || context.role_type.is_grc_family() {
            return RiskScope::Unrestricted;
        }

        if context.role_type.is_org_scoped() {
            return match &context.org_prefix {
                Some(prefix) => RiskScope::OrgOwner(prefix.clone()),
                None => RiskScope::Nothing,
            };
        }

        match context.role_type {
            RoleType::RsaEntry if !context.user_id.is_anonymous() => {
                RiskScope::EnteredBy(context.user_id)
            }
            _ => RiskScope::Nothing,
        }
    }
}
