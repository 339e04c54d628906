use chrono::{DateTime, Utc};
use garda_core::UserId;
use serde::{Deserialize, Serialize};

/// Provenance fields carried by every mutable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuditStamp {
    /// User that created the record.
    pub entered_by: Option<UserId>,
    /// Creation timestamp.
    pub entered_at: Option<DateTime<Utc>>,
    /// User that performed the latest mutation.
    pub updated_by: Option<UserId>,
    /// Timestamp of the latest mutation.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Record carrying provenance fields, stamped by a single reusable hook
/// instead of per-entity duplication.
pub trait Auditable {
    /// Returns the provenance fields.
    fn audit(&self) -> &AuditStamp;

    /// Returns the provenance fields for mutation.
    fn audit_mut(&mut self) -> &mut AuditStamp;
}

/// Stable audit actions emitted by application services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a superadmin override grants access.
    SuperadminOverrideUsed,
    /// Emitted when a risk reaches the approved status.
    RiskApproved,
    /// Emitted when a permanent risk code is assigned.
    RiskNumberAssigned,
    /// Emitted when permanent-number allocation fails after an approval.
    RiskNumberFailed,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperadminOverrideUsed => "security.superadmin.override_used",
            Self::RiskApproved => "risk.approved",
            Self::RiskNumberAssigned => "risk.number.assigned",
            Self::RiskNumberFailed => "risk.number.failed",
        }
    }
}
