use chrono::{DateTime, Utc};

/// Time source consumed by stamping and numbering services.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
