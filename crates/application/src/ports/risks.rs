use async_trait::async_trait;
use garda_core::{AppResult, OrgPrefix, UserId};
use garda_domain::{
    AssessmentId, InherentAssessment, LossEvent, Mitigation, MitigationId, Realization, Risk,
    RiskId, RiskStatus,
};
use serde::{Deserialize, Serialize};

/// Row restriction derived from the acting user's workflow context.
///
/// Adapters must honor the scope inside the data-access layer itself; it is
/// a mandatory filter, not a hint for callers to apply later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskScope {
    /// No restriction; superadmins and the GRC family.
    Unrestricted,
    /// Rows owned by one organizational unit.
    OrgOwner(OrgPrefix),
    /// Rows personally entered by one user.
    EnteredBy(UserId),
    /// Always-empty sentinel; unknown role types and missing context.
    Nothing,
}

impl RiskScope {
    /// Returns whether a row with the given ownership fields is visible.
    #[must_use]
    pub fn permits(&self, org_owner: &OrgPrefix, entered_by: UserId) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::OrgOwner(prefix) => org_owner == prefix,
            Self::EnteredBy(user_id) => entered_by == *user_id,
            Self::Nothing => false,
        }
    }
}

/// Narrowed query over risk rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskQuery {
    /// Row restriction from the acting user's context.
    pub scope: RiskScope,
    /// Optional lifecycle filter, set by the approval list.
    pub status: Option<RiskStatus>,
}

impl RiskQuery {
    /// Creates a query over every row with no lifecycle filter.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            scope: RiskScope::Unrestricted,
            status: None,
        }
    }

    /// Returns whether one risk row belongs to the query result set.
    #[must_use]
    pub fn matches(&self, risk: &Risk) -> bool {
        if !self.scope.permits(&risk.org_owner, risk.entered_by) {
            return false;
        }

        match self.status {
            None => true,
            Some(status) => risk.status == status,
        }
    }
}

/// Repository port for risk-register rows and their child records.
#[async_trait]
pub trait RiskRepository: Send + Sync {
    /// Persists a new risk row.
    async fn insert_risk(&self, risk: Risk) -> AppResult<()>;

    /// Replaces an existing risk row.
    async fn update_risk(&self, risk: Risk) -> AppResult<()>;

    /// Finds a risk row by id.
    async fn find_risk(&self, id: RiskId) -> AppResult<Option<Risk>>;

    /// Lists risk rows inside the query's scope and lifecycle filter.
    async fn list_risks(&self, query: &RiskQuery) -> AppResult<Vec<Risk>>;

    /// Persists a new loss-event row.
    async fn insert_loss_event(&self, event: LossEvent) -> AppResult<()>;

    /// Lists loss-event rows inside the scope.
    async fn list_loss_events(&self, scope: &RiskScope) -> AppResult<Vec<LossEvent>>;

    /// Persists a new inherent-assessment row.
    async fn insert_assessment(&self, assessment: InherentAssessment) -> AppResult<()>;

    /// Finds an inherent-assessment row by id.
    async fn find_assessment(&self, id: AssessmentId) -> AppResult<Option<InherentAssessment>>;

    /// Persists a new mitigation row.
    async fn insert_mitigation(&self, mitigation: Mitigation) -> AppResult<()>;

    /// Finds a mitigation row by id.
    async fn find_mitigation(&self, id: MitigationId) -> AppResult<Option<Mitigation>>;

    /// Persists a new realization row.
    async fn insert_realization(&self, realization: Realization) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use garda_core::{OrgPrefix, UserId};
    use garda_domain::{Risk, RiskId, RiskStatus};

    use super::{RiskQuery, RiskScope};

    fn org(value: &str) -> OrgPrefix {
        match OrgPrefix::new(value) {
            Ok(prefix) => prefix,
            Err(_) => panic!("test org prefix must be valid"),
        }
    }

    #[test]
    fn org_scope_permits_matching_unit_only() {
        let scope = RiskScope::OrgOwner(org("FIN"));
        assert!(scope.permits(&org("fin"), UserId::new(1)));
        assert!(!scope.permits(&org("OPS"), UserId::new(1)));
    }

    #[test]
    fn entered_by_scope_permits_own_rows_only() {
        let scope = RiskScope::EnteredBy(UserId::new(55));
        assert!(scope.permits(&org("FIN"), UserId::new(55)));
        assert!(!scope.permits(&org("FIN"), UserId::new(77)));
    }

    #[test]
    fn nothing_scope_permits_no_row() {
        assert!(!RiskScope::Nothing.permits(&org("FIN"), UserId::new(1)));
    }

    #[test]
    fn query_status_filter_narrows_matches() {
        let mut risk = Risk::new(RiskId::new(), "Vendor outage", org("FIN"), UserId::new(5));
        risk.status = RiskStatus::Submitted;

        let query = RiskQuery {
            scope: RiskScope::Unrestricted,
            status: Some(RiskStatus::Submitted),
        };
        assert!(query.matches(&risk));

        risk.status = RiskStatus::Draft;
        assert!(!query.matches(&risk));
    }
}
