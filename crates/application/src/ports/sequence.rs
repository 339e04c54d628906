use async_trait::async_trait;
use garda_core::{AppResult, OrgPrefix};

/// Port allocating permanent-number sequences.
///
/// Implementations must serialize allocation per `(org, year)` pair so that
/// concurrent approvals never receive the same sequence value.
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Returns the next unused sequence value for the pair.
    async fn next_sequence(&self, org: &OrgPrefix, year: i32) -> AppResult<u32>;
}
