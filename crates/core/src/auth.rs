use serde::{Deserialize, Serialize};

use crate::{OrgPrefix, UserId};

/// Acting-user snapshot supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    display_name: String,
    employee_number: Option<String>,
    org_prefix: Option<OrgPrefix>,
}

impl UserIdentity {
    /// Creates a user identity from directory and organizational data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        employee_number: Option<String>,
        org_prefix: Option<OrgPrefix>,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            employee_number,
            org_prefix,
        }
    }

    /// Returns the stable directory id for the user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the secondary personnel identifier, if the directory holds one.
    #[must_use]
    pub fn employee_number(&self) -> Option<&str> {
        self.employee_number.as_deref()
    }

    /// Returns the organizational unit the user belongs to.
    #[must_use]
    pub fn org_prefix(&self) -> Option<&OrgPrefix> {
        self.org_prefix.as_ref()
    }
}
