//! Repository and collaborator ports consumed by application services.

mod access;
mod audit;
mod clock;
mod risks;
mod sequence;

pub use access::AccessRepository;
pub use audit::{AuditEvent, AuditRepository};
pub use clock::Clock;
pub use risks::{RiskQuery, RiskRepository, RiskScope};
pub use sequence::SequenceAllocator;
