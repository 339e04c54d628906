//! Application services and ports for the risk-register access core.

#![forbid(unsafe_code)]

mod approval_workflow;
mod config;
mod permission_service;
mod ports;
mod provenance;
mod risk_numbering;
mod risk_service;
mod superadmin_policy;

pub use approval_workflow::{AccessOrigin, ApprovalWorkflow, RecordAccess, WorkflowContext};
pub use config::AccessConfig;
pub use permission_service::PermissionService;
pub use ports::{
    AccessRepository, AuditEvent, AuditRepository, Clock, RiskQuery, RiskRepository, RiskScope,
    SequenceAllocator,
};
pub use provenance::ProvenanceStamper;
pub use risk_numbering::RiskNumberService;
pub use risk_service::RiskService;
pub use superadmin_policy::SuperadminPolicy;
