//! Shared primitives for all Rust crates in Garda.

#![forbid(unsafe_code)]

/// Authenticated-user primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Garda crates.
pub type AppResult<T> = Result<T, AppError>;

/// Numeric identifier of a staff user in the directory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct UserId(i64);

impl UserId {
    /// Identity used for provenance when no authenticated user exists.
    pub const ANONYMOUS: UserId = UserId(0);

    /// Creates a user identifier from a raw directory id.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw directory id.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns whether this is the anonymous/system identity.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0 == 0
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Organizational unit code that owns a risk-register row.
///
/// Normalized on construction: surrounding whitespace is dropped and the
/// code is upper-cased, so equality between two prefixes is effectively
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrgPrefix(String);

impl OrgPrefix {
    /// Creates a validated organizational prefix.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let normalized = value.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(AppError::Validation(
                "organizational prefix must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OrgPrefix {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
