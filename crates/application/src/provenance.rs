use std::sync::Arc;

use garda_core::{UserId, UserIdentity};
use garda_domain::Auditable;

use crate::Clock;

/// Stamps creator and updater provenance on every mutating entity.
///
/// One hook serves the whole domain instead of per-entity duplication.
#[derive(Clone)]
pub struct ProvenanceStamper {
    clock: Arc<dyn Clock>,
}

impl ProvenanceStamper {
    /// Creates the stamper from a time source.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Stamps a freshly created record.
    ///
    /// Creator fields are filled only when unset; update fields are cleared
    /// so a new record never carries stale updater provenance.
    pub fn stamp_created(&self, actor: Option<&UserIdentity>, record: &mut impl Auditable) {
        let audit = record.audit_mut();

        if audit.entered_by.is_none() {
            audit.entered_by = Some(acting_id(actor));
        }
        if audit.entered_at.is_none() {
            audit.entered_at = Some(self.clock.now());
        }

        audit.updated_by = None;
        audit.updated_at = None;
    }

    /// Stamps a mutated record; updater fields are always overwritten.
    pub fn stamp_updated(&self, actor: Option<&UserIdentity>, record: &mut impl Auditable) {
        let audit = record.audit_mut();
        audit.updated_by = Some(acting_id(actor));
        audit.updated_at = Some(self.clock.now());
    }
}

fn acting_id(actor: Option<&UserIdentity>) -> UserId {
    actor.map_or(UserId::ANONYMOUS, UserIdentity::user_id)
}
