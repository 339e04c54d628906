use std::sync::Arc;

use garda_core::{AppError, AppResult, OrgPrefix, UserId, UserIdentity};
use garda_domain::{
    AssessmentId, AuditAction, InherentAssessment, LossEvent, LossEventId, MenuKey, Mitigation,
    MitigationId, Permission, Realization, RealizationId, Risk, RiskId, RiskStatus,
};

use crate::{
    AccessOrigin, ApprovalWorkflow, AuditEvent, AuditRepository, PermissionService,
    ProvenanceStamper, RiskNumberService, RiskRepository,
};

/// Orchestrates risk-register mutations behind the permission gate.
///
/// Every operation runs the same chain: menu-level permission gate, then
/// role-type scope narrowing, then the mutation with provenance stamping.
/// The approval transition additionally drives permanent-number assignment
/// and the audit event log.
#[derive(Clone)]
pub struct RiskService {
    permissions: PermissionService,
    workflow: ApprovalWorkflow,
    numbering: RiskNumberService,
    stamper: ProvenanceStamper,
    risk_repository: Arc<dyn RiskRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RiskService {
    /// Creates the service from its collaborators.
    #[must_use]
    pub fn new(
        permissions: PermissionService,
        workflow: ApprovalWorkflow,
        numbering: RiskNumberService,
        stamper: ProvenanceStamper,
        risk_repository: Arc<dyn RiskRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            permissions,
            workflow,
            numbering,
            stamper,
            risk_repository,
            audit_repository,
        }
    }

    /// Creates a draft risk owned by the given organizational unit.
    pub async fn create_risk(
        &self,
        actor: &UserIdentity,
        name: &str,
        org_owner: OrgPrefix,
    ) -> AppResult<Risk> {
        self.require_crud(actor, MenuKey::RISK_REGISTER, Permission::Create)
            .await?;
        self.require_writable_org(actor, &org_owner).await?;

        let mut risk = Risk::new(RiskId::new(), name, org_owner, actor.user_id());
        self.stamper.stamp_created(Some(actor), &mut risk);
        self.risk_repository.insert_risk(risk.clone()).await?;
        Ok(risk)
    }

    /// Renames an existing risk within the actor's scope.
    pub async fn update_risk(
        &self,
        actor: &UserIdentity,
        id: RiskId,
        name: &str,
    ) -> AppResult<Risk> {
        self.require_crud(actor, MenuKey::RISK_REGISTER, Permission::Update)
            .await?;
        let mut risk = self.load_scoped_risk(actor, id).await?;

        risk.name = name.to_owned();
        self.stamper.stamp_updated(Some(actor), &mut risk);
        self.risk_repository.update_risk(risk.clone()).await?;
        Ok(risk)
    }

    /// Submits a draft or revised risk for approval.
    pub async fn submit_risk(&self, actor: &UserIdentity, id: RiskId) -> AppResult<Risk> {
        self.require_crud(actor, MenuKey::RISK_REGISTER, Permission::Update)
            .await?;
        let mut risk = self.load_scoped_risk(actor, id).await?;

        if !matches!(risk.status, RiskStatus::Draft | RiskStatus::Revision) {
            return Err(AppError::Validation(format!(
                "risk '{id}' cannot be submitted from its current status"
            )));
        }

        risk.status = RiskStatus::Submitted;
        self.stamper.stamp_updated(Some(actor), &mut risk);
        self.risk_repository.update_risk(risk.clone()).await?;
        Ok(risk)
    }

    /// Approves a submitted risk and assigns its permanent number.
    ///
    /// A numbering failure keeps the approved status: the transition is
    /// persisted, the failure is logged and recorded in the audit log for
    /// manual remediation.
    pub async fn approve_risk(&self, actor: &UserIdentity, id: RiskId) -> AppResult<Risk> {
        let mut risk = self.load_approvable_risk(actor, id).await?;

        let previous = risk.status;
        risk.status = RiskStatus::Approved;
        self.stamper.stamp_updated(Some(actor), &mut risk);

        let numbering = self
            .numbering
            .assign_on_status_change(&mut risk, previous)
            .await;

        self.risk_repository.update_risk(risk.clone()).await?;
        self.append_event(actor, AuditAction::RiskApproved, &risk, None)
            .await?;

        match numbering {
            Ok(Some(code)) => {
                self.append_event(
                    actor,
                    AuditAction::RiskNumberAssigned,
                    &risk,
                    Some(format!("assigned permanent code '{code}'")),
                )
                .await?;
            }
            Ok(None) => {}
            Err(error) => {
                self.append_event(
                    actor,
                    AuditAction::RiskNumberFailed,
                    &risk,
                    Some(format!("number allocation failed: {error}")),
                )
                .await?;
            }
        }

        Ok(risk)
    }

    /// Rejects a submitted risk.
    pub async fn reject_risk(&self, actor: &UserIdentity, id: RiskId) -> AppResult<Risk> {
        let mut risk = self.load_approvable_risk(actor, id).await?;

        risk.status = RiskStatus::Rejected;
        self.stamper.stamp_updated(Some(actor), &mut risk);
        self.risk_repository.update_risk(risk.clone()).await?;
        Ok(risk)
    }

    /// Lists register rows visible to the actor.
    pub async fn list_risks(&self, actor: &UserIdentity) -> AppResult<Vec<Risk>> {
        self.require_crud(actor, MenuKey::RISK_REGISTER, Permission::Read)
            .await?;
        let context = self.workflow.context(actor).await?;
        let query = self.workflow.register_query(&context);
        self.risk_repository.list_risks(&query).await
    }

    /// Lists submitted rows awaiting the actor's decision.
    pub async fn list_approval_queue(&self, actor: &UserIdentity) -> AppResult<Vec<Risk>> {
        self.require_crud(actor, MenuKey::RISK_APPROVAL, Permission::Read)
            .await?;
        let context = self.workflow.context(actor).await?;
        let query = self.workflow.approval_query(&context);
        self.risk_repository.list_risks(&query).await
    }

    /// Loads one risk row through the record-level capability check.
    pub async fn view_risk(
        &self,
        actor: &UserIdentity,
        id: RiskId,
        origin: AccessOrigin,
    ) -> AppResult<Risk> {
        let risk = self
            .risk_repository
            .find_risk(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("risk '{id}' does not exist")))?;

        let access = self.workflow.risk_record_access(actor, &risk, origin).await?;
        if !access.is_allowed() {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not view risk '{id}'",
                actor.user_id()
            )));
        }

        Ok(risk)
    }

    /// Records a loss event owned by the given organizational unit.
    pub async fn record_loss_event(
        &self,
        actor: &UserIdentity,
        name: &str,
        risk_id: Option<RiskId>,
        org_owner: OrgPrefix,
    ) -> AppResult<LossEvent> {
        self.require_crud(actor, MenuKey::LOSS_EVENT, Permission::Create)
            .await?;
        self.require_writable_org(actor, &org_owner).await?;

        let mut event = LossEvent::new(
            LossEventId::new(),
            name,
            risk_id,
            org_owner,
            actor.user_id(),
        );
        self.stamper.stamp_created(Some(actor), &mut event);
        self.risk_repository.insert_loss_event(event.clone()).await?;
        Ok(event)
    }

    /// Records an inherent assessment under a visible parent risk.
    pub async fn record_assessment(
        &self,
        actor: &UserIdentity,
        risk_id: RiskId,
        likelihood: u8,
        impact: u8,
    ) -> AppResult<InherentAssessment> {
        self.require_crud(actor, MenuKey::INHERENT_ASSESSMENT, Permission::Create)
            .await?;
        let parent = self.load_scoped_risk(actor, risk_id).await?;

        let mut assessment = InherentAssessment::new(
            AssessmentId::new(),
            parent.id,
            likelihood,
            impact,
            parent.org_owner.clone(),
            actor.user_id(),
        );
        self.stamper.stamp_created(Some(actor), &mut assessment);
        self.risk_repository
            .insert_assessment(assessment.clone())
            .await?;
        Ok(assessment)
    }

    /// Records a mitigation plan under a visible parent assessment.
    pub async fn record_mitigation(
        &self,
        actor: &UserIdentity,
        assessment_id: AssessmentId,
        action_plan: &str,
    ) -> AppResult<Mitigation> {
        self.require_crud(actor, MenuKey::MITIGATION, Permission::Create)
            .await?;

        let parent = self
            .risk_repository
            .find_assessment(assessment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("assessment '{assessment_id}' does not exist"))
            })?;
        self.require_visible_row(actor, &parent.org_owner, parent.entered_by)
            .await?;

        let mut mitigation = Mitigation::new(
            MitigationId::new(),
            parent.id,
            action_plan,
            parent.org_owner.clone(),
            actor.user_id(),
        );
        self.stamper.stamp_created(Some(actor), &mut mitigation);
        self.risk_repository
            .insert_mitigation(mitigation.clone())
            .await?;
        Ok(mitigation)
    }

    /// Records a progress realization under a visible parent mitigation.
    pub async fn record_realization(
        &self,
        actor: &UserIdentity,
        mitigation_id: MitigationId,
        progress_note: &str,
        percent_complete: u8,
    ) -> AppResult<Realization> {
        self.require_crud(actor, MenuKey::REALIZATION, Permission::Create)
            .await?;

        let parent = self
            .risk_repository
            .find_mitigation(mitigation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("mitigation '{mitigation_id}' does not exist"))
            })?;
        self.require_visible_row(actor, &parent.org_owner, parent.entered_by)
            .await?;

        let mut realization = Realization::new(
            RealizationId::new(),
            parent.id,
            progress_note,
            percent_complete,
            parent.org_owner.clone(),
            actor.user_id(),
        )?;
        self.stamper.stamp_created(Some(actor), &mut realization);
        self.risk_repository
            .insert_realization(realization.clone())
            .await?;
        Ok(realization)
    }

    async fn require_crud(
        &self,
        actor: &UserIdentity,
        menu: &str,
        permission: Permission,
    ) -> AppResult<()> {
        let menu = MenuKey::new(menu)?;
        if self.permissions.is_superuser(actor) {
            self.audit_repository
                .append_event(AuditEvent {
                    subject: actor.user_id(),
                    action: AuditAction::SuperadminOverrideUsed,
                    resource_type: "menu".to_owned(),
                    resource_id: menu.to_string(),
                    detail: Some(format!(
                        "superuser override for permission '{}'",
                        permission.as_str()
                    )),
                })
                .await?;
            return Ok(());
        }

        if self.permissions.can_crud(actor, &menu, permission).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is missing permission '{}' on menu '{menu}'",
            actor.user_id(),
            permission.as_str()
        )))
    }

    /// Loads a risk and confirms it sits inside the actor's register scope.
    async fn load_scoped_risk(&self, actor: &UserIdentity, id: RiskId) -> AppResult<Risk> {
        let risk = self
            .risk_repository
            .find_risk(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("risk '{id}' does not exist")))?;

        self.require_visible_row(actor, &risk.org_owner, risk.entered_by)
            .await?;
        Ok(risk)
    }

    /// Loads a risk for an approval decision, gated by the approve bit and
    /// the approval-scoped query.
    async fn load_approvable_risk(&self, actor: &UserIdentity, id: RiskId) -> AppResult<Risk> {
        let approval_menu = MenuKey::new(MenuKey::RISK_APPROVAL)?;
        if !self
            .workflow
            .can_approve(actor, std::slice::from_ref(&approval_menu))
            .await?
        {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not decide approvals",
                actor.user_id()
            )));
        }

        let risk = self
            .risk_repository
            .find_risk(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("risk '{id}' does not exist")))?;

        let context = self.workflow.context(actor).await?;
        if !self.workflow.approval_query(&context).matches(&risk) {
            return Err(AppError::Forbidden(format!(
                "risk '{id}' is outside the approval queue for user '{}'",
                actor.user_id()
            )));
        }

        Ok(risk)
    }

    async fn require_writable_org(
        &self,
        actor: &UserIdentity,
        org_owner: &OrgPrefix,
    ) -> AppResult<()> {
        self.require_visible_row(actor, org_owner, actor.user_id())
            .await
    }

    async fn require_visible_row(
        &self,
        actor: &UserIdentity,
        org_owner: &OrgPrefix,
        entered_by: UserId,
    ) -> AppResult<()> {
        let context = self.workflow.context(actor).await?;
        let query = self.workflow.register_query(&context);
        if query.scope.permits(org_owner, entered_by) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "row owned by '{org_owner}' is outside the scope of user '{}'",
            actor.user_id()
        )))
    }

    async fn append_event(
        &self,
        actor: &UserIdentity,
        action: AuditAction,
        risk: &Risk,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.user_id(),
                action,
                resource_type: "risk".to_owned(),
                resource_id: risk.id.to_string(),
                detail,
            })
            .await
    }
}
