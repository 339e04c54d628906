use std::collections::HashMap;

use async_trait::async_trait;
use garda_application::{RiskQuery, RiskRepository, RiskScope};
use garda_core::{AppError, AppResult};
use garda_domain::{
    AssessmentId, InherentAssessment, LossEvent, LossEventId, Mitigation, MitigationId,
    Realization, RealizationId, Risk, RiskId,
};
use tokio::sync::RwLock;

/// In-memory risk-register store.
///
/// Scope narrowing happens inside the adapter: list operations evaluate the
/// query against every stored row, so no caller can widen the result set
/// after the fact.
#[derive(Debug, Default)]
pub struct InMemoryRiskRepository {
    risks: RwLock<HashMap<RiskId, Risk>>,
    loss_events: RwLock<HashMap<LossEventId, LossEvent>>,
    assessments: RwLock<HashMap<AssessmentId, InherentAssessment>>,
    mitigations: RwLock<HashMap<MitigationId, Mitigation>>,
    realizations: RwLock<HashMap<RealizationId, Realization>>,
}

impl InMemoryRiskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RiskRepository for InMemoryRiskRepository {
    async fn insert_risk(&self, risk: Risk) -> AppResult<()> {
        let mut risks = self.risks.write().await;

        if risks.contains_key(&risk.id) {
            return Err(AppError::Conflict(format!(
                "risk '{}' already exists",
                risk.id
            )));
        }

        risks.insert(risk.id, risk);
        Ok(())
    }

    async fn update_risk(&self, risk: Risk) -> AppResult<()> {
        let mut risks = self.risks.write().await;

        if !risks.contains_key(&risk.id) {
            return Err(AppError::NotFound(format!(
                "risk '{}' does not exist",
                risk.id
            )));
        }

        risks.insert(risk.id, risk);
        Ok(())
    }

    async fn find_risk(&self, id: RiskId) -> AppResult<Option<Risk>> {
        Ok(self.risks.read().await.get(&id).cloned())
    }

    async fn list_risks(&self, query: &RiskQuery) -> AppResult<Vec<Risk>> {
        let risks = self.risks.read().await;

        let mut rows: Vec<Risk> = risks
            .values()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(rows)
    }

    async fn insert_loss_event(&self, event: LossEvent) -> AppResult<()> {
        let mut events = self.loss_events.write().await;

        if events.contains_key(&event.id) {
            return Err(AppError::Conflict(format!(
                "loss event '{}' already exists",
                event.id
            )));
        }

        events.insert(event.id, event);
        Ok(())
    }

    async fn list_loss_events(&self, scope: &RiskScope) -> AppResult<Vec<LossEvent>> {
        let events = self.loss_events.read().await;

        let mut rows: Vec<LossEvent> = events
            .values()
            .filter(|row| scope.permits(&row.org_owner, row.entered_by))
            .cloned()
            .collect();
        rows.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(rows)
    }

    async fn insert_assessment(&self, assessment: InherentAssessment) -> AppResult<()> {
        let mut assessments = self.assessments.write().await;

        if assessments.contains_key(&assessment.id) {
            return Err(AppError::Conflict(format!(
                "assessment '{}' already exists",
                assessment.id
            )));
        }

        assessments.insert(assessment.id, assessment);
        Ok(())
    }

    async fn find_assessment(&self, id: AssessmentId) -> AppResult<Option<InherentAssessment>> {
        Ok(self.assessments.read().await.get(&id).cloned())
    }

    async fn insert_mitigation(&self, mitigation: Mitigation) -> AppResult<()> {
        let mut mitigations = self.mitigations.write().await;

        if mitigations.contains_key(&mitigation.id) {
            return Err(AppError::Conflict(format!(
                "mitigation '{}' already exists",
                mitigation.id
            )));
        }

        mitigations.insert(mitigation.id, mitigation);
        Ok(())
    }

    async fn find_mitigation(&self, id: MitigationId) -> AppResult<Option<Mitigation>> {
        Ok(self.mitigations.read().await.get(&id).cloned())
    }

    async fn insert_realization(&self, realization: Realization) -> AppResult<()> {
        let mut realizations = self.realizations.write().await;

        if realizations.contains_key(&realization.id) {
            return Err(AppError::Conflict(format!(
                "realization '{}' already exists",
                realization.id
            )));
        }

        realizations.insert(realization.id, realization);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use garda_application::{RiskQuery, RiskRepository, RiskScope};
    use garda_core::{OrgPrefix, UserId};
    use garda_domain::{Risk, RiskId, RiskStatus};

    use super::InMemoryRiskRepository;

    fn org(value: &str) -> OrgPrefix {
        match OrgPrefix::new(value) {
            Ok(prefix) => prefix,
            Err(_) => panic!("test org prefix must be valid"),
        }
    }

    #[tokio::test]
    async fn duplicate_risk_insertion_conflicts() {
        let repository = InMemoryRiskRepository::new();
        let risk = Risk::new(RiskId::new(), "Vendor outage", org("FIN"), UserId::new(5));

        assert!(repository.insert_risk(risk.clone()).await.is_ok());
        assert!(repository.insert_risk(risk).await.is_err());
    }

    #[tokio::test]
    async fn updating_a_missing_risk_fails() {
        let repository = InMemoryRiskRepository::new();
        let risk = Risk::new(RiskId::new(), "Vendor outage", org("FIN"), UserId::new(5));

        assert!(repository.update_risk(risk).await.is_err());
    }

    #[tokio::test]
    async fn listing_applies_the_scope_inside_the_adapter() {
        let repository = InMemoryRiskRepository::new();
        let fin = Risk::new(RiskId::new(), "Fin risk", org("FIN"), UserId::new(5));
        let ops = Risk::new(RiskId::new(), "Ops risk", org("OPS"), UserId::new(6));
        assert!(repository.insert_risk(fin).await.is_ok());
        assert!(repository.insert_risk(ops).await.is_ok());

        let query = RiskQuery {
            scope: RiskScope::OrgOwner(org("FIN")),
            status: None,
        };
        let rows = repository.list_risks(&query).await.unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().map(|row| row.name.as_str()), Some("Fin risk"));

        let nothing = RiskQuery {
            scope: RiskScope::Nothing,
            status: None,
        };
        let rows = repository.list_risks(&nothing).await.unwrap_or_default();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn status_filter_narrows_listing() {
        let repository = InMemoryRiskRepository::new();
        let mut submitted = Risk::new(RiskId::new(), "Submitted", org("FIN"), UserId::new(5));
        submitted.status = RiskStatus::Submitted;
        let draft = Risk::new(RiskId::new(), "Draft", org("FIN"), UserId::new(5));
        assert!(repository.insert_risk(submitted).await.is_ok());
        assert!(repository.insert_risk(draft).await.is_ok());

        let query = RiskQuery {
            scope: RiskScope::Unrestricted,
            status: Some(RiskStatus::Submitted),
        };
        let rows = repository.list_risks(&query).await.unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().map(|row| row.name.as_str()), Some("Submitted"));
    }
}
