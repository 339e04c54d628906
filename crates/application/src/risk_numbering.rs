use std::sync::Arc;

use chrono::Datelike;
use garda_core::AppResult;
use garda_domain::{Risk, RiskStatus, compose_risk_code};

use crate::{Clock, SequenceAllocator};

/// Assigns the permanent risk code on the approval transition.
///
/// The code is generated exactly once: only when the status actually changed
/// on this mutation, the new status is approved, and no real code is stored
/// yet. Allocation failure is surfaced to the caller, which must keep the
/// already-committed approval rather than roll it back.
#[derive(Clone)]
pub struct RiskNumberService {
    allocator: Arc<dyn SequenceAllocator>,
    clock: Arc<dyn Clock>,
}

impl RiskNumberService {
    /// Creates the service from an allocator and a time source.
    #[must_use]
    pub fn new(allocator: Arc<dyn SequenceAllocator>, clock: Arc<dyn Clock>) -> Self {
        Self { allocator, clock }
    }

    /// Assigns the permanent code when the transition qualifies.
    ///
    /// Returns the newly assigned code, or `None` when the guards decided
    /// nothing should be generated.
    pub async fn assign_on_status_change(
        &self,
        risk: &mut Risk,
        previous: RiskStatus,
    ) -> AppResult<Option<String>> {
        if risk.status == previous || !risk.status.is_approved() || risk.has_assigned_code() {
            return Ok(None);
        }

        let year = self.clock.now().year();
        let sequence = match self.allocator.next_sequence(&risk.org_owner, year).await {
            Ok(sequence) => sequence,
            Err(error) => {
                tracing::error!(
                    risk_id = %risk.id,
                    org = %risk.org_owner,
                    year,
                    prior_code = risk.code.as_deref().unwrap_or(""),
                    %error,
                    "permanent risk number allocation failed"
                );
                return Err(error);
            }
        };

        let code = compose_risk_code(&risk.org_owner, year, sequence);
        risk.code = Some(code.clone());
        Ok(Some(code))
    }
}
