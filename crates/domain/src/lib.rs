//! Domain entities and invariants for the risk-register core.

#![forbid(unsafe_code)]

mod audit;
mod menu;
mod permission;
mod risk;
mod role;

pub use audit::{AuditAction, AuditStamp, Auditable};
pub use menu::{MenuDefinition, MenuKey};
pub use permission::{Permission, PermissionMask};
pub use risk::{
    AssessmentId, InherentAssessment, LossEvent, LossEventId, Mitigation, MitigationId,
    Realization, RealizationId, Risk, RiskId, RiskStatus, compose_risk_code,
};
pub use role::{Role, RoleAssignment, RoleId, RoleType, SUPERADMIN_ROLE_CODE};
