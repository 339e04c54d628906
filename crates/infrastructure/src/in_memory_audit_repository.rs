use async_trait::async_trait;
use garda_application::{AuditEvent, AuditRepository};
use garda_core::AppResult;
use tokio::sync::Mutex;

/// Append-only in-memory audit log.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty in-memory audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded event in append order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
