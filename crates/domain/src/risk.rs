use std::fmt::{Display, Formatter};

use garda_core::{AppError, AppResult, OrgPrefix, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuditStamp, Auditable};

/// Unique identifier for a risk record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RiskId(Uuid);

impl RiskId {
    /// Creates a new random risk identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a risk identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RiskId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RiskId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a loss-event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LossEventId(Uuid);

impl LossEventId {
    /// Creates a new random loss-event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a loss-event identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LossEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for LossEventId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for an inherent-assessment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssessmentId(Uuid);

impl AssessmentId {
    /// Creates a new random assessment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an assessment identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AssessmentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a mitigation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MitigationId(Uuid);

impl MitigationId {
    /// Creates a new random mitigation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a mitigation identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MitigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MitigationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a realization record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RealizationId(Uuid);

impl RealizationId {
    /// Creates a new random realization identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a realization identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RealizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RealizationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle states of a risk record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    /// Being drafted by the entering officer.
    Draft,
    /// Submitted and awaiting an approval decision.
    Submitted,
    /// Returned by an approver for revision.
    Revision,
    /// Approved; triggers permanent-number assignment.
    Approved,
    /// Rejected by an approver.
    Rejected,
}

impl RiskStatus {
    /// Returns the stable wire code for this status.
    #[must_use]
    pub fn as_code(&self) -> u8 {
        match self {
            Self::Draft => 1,
            Self::Submitted => 2,
            Self::Revision => 3,
            Self::Approved => 4,
            Self::Rejected => 5,
        }
    }

    /// Parses a wire code into a status.
    pub fn from_code(code: u8) -> AppResult<Self> {
        match code {
            1 => Ok(Self::Draft),
            2 => Ok(Self::Submitted),
            3 => Ok(Self::Revision),
            4 => Ok(Self::Approved),
            5 => Ok(Self::Rejected),
            other => Err(AppError::Validation(format!(
                "unknown risk status code {other}"
            ))),
        }
    }

    /// Returns whether this status is the approved terminal state.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Composes the permanent risk code from its parts.
///
/// The sequence is rendered with three digits minimum and widens naturally
/// past 999.
#[must_use]
pub fn compose_risk_code(org: &OrgPrefix, year: i32, sequence: u32) -> String {
    format!("{}{}{:03}", org.as_str(), year, sequence)
}

/// Top-level risk-register record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    /// Stable risk identifier.
    pub id: RiskId,
    /// Short risk name.
    pub name: String,
    /// Organizational unit owning the row.
    pub org_owner: OrgPrefix,
    /// Current lifecycle state.
    pub status: RiskStatus,
    /// Permanent risk code, assigned once on approval.
    pub code: Option<String>,
    /// User that entered the row.
    pub entered_by: UserId,
    /// Provenance fields.
    pub audit: AuditStamp,
}

impl Risk {
    /// Creates a draft risk with no permanent code.
    #[must_use]
    pub fn new(id: RiskId, name: impl Into<String>, org_owner: OrgPrefix, entered_by: UserId) -> Self {
        Self {
            id,
            name: name.into(),
            org_owner,
            status: RiskStatus::Draft,
            code: None,
            entered_by,
            audit: AuditStamp::default(),
        }
    }

    /// Returns whether a real permanent code is already present.
    ///
    /// Empty strings and the literal `"null"` left behind by legacy imports
    /// count as unassigned.
    #[must_use]
    pub fn has_assigned_code(&self) -> bool {
        match self.code.as_deref() {
            None => false,
            Some(value) => {
                let trimmed = value.trim();
                !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("null")
            }
        }
    }
}

impl Auditable for Risk {
    fn audit(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Operational loss event recorded against an organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossEvent {
    /// Stable loss-event identifier.
    pub id: LossEventId,
    /// Short event name.
    pub name: String,
    /// Risk the event is linked to, when one is identified.
    pub risk_id: Option<RiskId>,
    /// Organizational unit owning the row.
    pub org_owner: OrgPrefix,
    /// User that entered the row.
    pub entered_by: UserId,
    /// Provenance fields.
    pub audit: AuditStamp,
}

impl LossEvent {
    /// Creates a loss event owned by one organizational unit.
    #[must_use]
    pub fn new(
        id: LossEventId,
        name: impl Into<String>,
        risk_id: Option<RiskId>,
        org_owner: OrgPrefix,
        entered_by: UserId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            risk_id,
            org_owner,
            entered_by,
            audit: AuditStamp::default(),
        }
    }
}

impl Auditable for LossEvent {
    fn audit(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Inherent likelihood/impact assessment attached to a risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InherentAssessment {
    /// Stable assessment identifier.
    pub id: AssessmentId,
    /// Parent risk.
    pub risk_id: RiskId,
    /// Assessed likelihood on the register scale.
    pub likelihood: u8,
    /// Assessed impact on the register scale.
    pub impact: u8,
    /// Organizational unit owning the row, inherited from the parent risk.
    pub org_owner: OrgPrefix,
    /// User that entered the row.
    pub entered_by: UserId,
    /// Provenance fields.
    pub audit: AuditStamp,
}

impl InherentAssessment {
    /// Creates an assessment under a parent risk.
    #[must_use]
    pub fn new(
        id: AssessmentId,
        risk_id: RiskId,
        likelihood: u8,
        impact: u8,
        org_owner: OrgPrefix,
        entered_by: UserId,
    ) -> Self {
        Self {
            id,
            risk_id,
            likelihood,
            impact,
            org_owner,
            entered_by,
            audit: AuditStamp::default(),
        }
    }
}

impl Auditable for InherentAssessment {
    fn audit(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Mitigation plan attached to an inherent assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mitigation {
    /// Stable mitigation identifier.
    pub id: MitigationId,
    /// Parent assessment.
    pub assessment_id: AssessmentId,
    /// Planned mitigation action.
    pub action_plan: String,
    /// Organizational unit owning the row, inherited from the parent.
    pub org_owner: OrgPrefix,
    /// User that entered the row.
    pub entered_by: UserId,
    /// Provenance fields.
    pub audit: AuditStamp,
}

impl Mitigation {
    /// Creates a mitigation under a parent assessment.
    #[must_use]
    pub fn new(
        id: MitigationId,
        assessment_id: AssessmentId,
        action_plan: impl Into<String>,
        org_owner: OrgPrefix,
        entered_by: UserId,
    ) -> Self {
        Self {
            id,
            assessment_id,
            action_plan: action_plan.into(),
            org_owner,
            entered_by,
            audit: AuditStamp::default(),
        }
    }
}

impl Auditable for Mitigation {
    fn audit(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Progress realization recorded against a mitigation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realization {
    /// Stable realization identifier.
    pub id: RealizationId,
    /// Parent mitigation.
    pub mitigation_id: MitigationId,
    /// Progress note from the reporting officer.
    pub progress_note: String,
    /// Completion percentage in `[0, 100]`.
    pub percent_complete: u8,
    /// Organizational unit owning the row, inherited from the parent.
    pub org_owner: OrgPrefix,
    /// User that entered the row.
    pub entered_by: UserId,
    /// Provenance fields.
    pub audit: AuditStamp,
}

impl Realization {
    /// Creates a realization under a parent mitigation.
    pub fn new(
        id: RealizationId,
        mitigation_id: MitigationId,
        progress_note: impl Into<String>,
        percent_complete: u8,
        org_owner: OrgPrefix,
        entered_by: UserId,
    ) -> AppResult<Self> {
        if percent_complete > 100 {
            return Err(AppError::Validation(format!(
                "completion percentage {percent_complete} exceeds 100"
            )));
        }

        Ok(Self {
            id,
            mitigation_id,
            progress_note: progress_note.into(),
            percent_complete,
            org_owner,
            entered_by,
            audit: AuditStamp::default(),
        })
    }
}

impl Auditable for Realization {
    fn audit(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}
