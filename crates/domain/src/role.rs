use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use garda_core::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MenuKey, PermissionMask};

/// Role code that marks the role-driven superadmin, distinct from the
/// identity-allowlist policy.
pub const SUPERADMIN_ROLE_CODE: &str = "SUPERADMIN";

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Named permission bundle assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role identifier.
    pub id: RoleId,
    /// Human-readable role name.
    pub name: String,
    /// Stable role code driving role-type classification.
    pub code: String,
    /// Inactive roles contribute nothing to effective permissions.
    pub is_active: bool,
    /// Permission mask stored per canonical menu key.
    pub menu_permissions: BTreeMap<MenuKey, PermissionMask>,
}

impl Role {
    /// Creates an active role with no menu grants.
    #[must_use]
    pub fn new(id: RoleId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            is_active: true,
            menu_permissions: BTreeMap::new(),
        }
    }

    /// Returns the role extended with one menu grant.
    #[must_use]
    pub fn with_grant(mut self, menu: MenuKey, mask: PermissionMask) -> Self {
        self.menu_permissions.insert(menu, mask);
        self
    }

    /// Returns the stored mask for a canonical menu key, empty when unmapped.
    #[must_use]
    pub fn mask_for(&self, menu: &MenuKey) -> PermissionMask {
        self.menu_permissions
            .get(menu)
            .copied()
            .unwrap_or(PermissionMask::EMPTY)
    }

    /// Returns whether the role carries the role-driven superadmin code.
    #[must_use]
    pub fn is_superadmin_role(&self) -> bool {
        self.code.trim().eq_ignore_ascii_case(SUPERADMIN_ROLE_CODE)
    }
}

/// Association of a user with one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
}

/// Derived classification of a user's organizational function.
///
/// Computed from role codes at evaluation time and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    /// GRC administrator, sees every row.
    AdminGrc,
    /// GRC approver, sees every row.
    ApprovalGrc,
    /// GRC staff, sees every row.
    Grc,
    /// Risk officer, restricted to the own organizational unit.
    RiskOfficer,
    /// Legacy alias of [`RoleType::RiskOfficer`], scoped identically.
    Officer,
    /// Division head, restricted to the own organizational unit.
    Kadiv,
    /// Self-assessment entry clerk, restricted to personally entered rows.
    RsaEntry,
    /// No recognized role; every scoped query is empty.
    Unknown,
}

impl RoleType {
    /// Derives a classification from a stored role code.
    #[must_use]
    pub fn from_role_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "ADMIN_GRC" => Self::AdminGrc,
            "APPROVAL_GRC" => Self::ApprovalGrc,
            "GRC" => Self::Grc,
            "RISK_OFFICER" => Self::RiskOfficer,
            "OFFICER" => Self::Officer,
            "KADIV" => Self::Kadiv,
            "RSA_ENTRY" => Self::RsaEntry,
            _ => Self::Unknown,
        }
    }

    /// Classifies a user from all active assigned roles.
    ///
    /// When several roles classify, the most privileged wins: GRC family
    /// first, then org-scoped types, then entry clerks.
    #[must_use]
    pub fn classify<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Self {
        roles
            .into_iter()
            .filter(|role| role.is_active)
            .map(|role| Self::from_role_code(role.code.as_str()))
            .min_by_key(|role_type| role_type.precedence())
            .unwrap_or(Self::Unknown)
    }

    /// Returns whether this type belongs to the unrestricted GRC family.
    #[must_use]
    pub fn is_grc_family(&self) -> bool {
        matches!(self, Self::AdminGrc | Self::ApprovalGrc | Self::Grc)
    }

    /// Returns whether this type is restricted to the own organizational unit.
    #[must_use]
    pub fn is_org_scoped(&self) -> bool {
        matches!(self, Self::RiskOfficer | Self::Officer | Self::Kadiv)
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::AdminGrc => 0,
            Self::ApprovalGrc => 1,
            Self::Grc => 2,
            Self::Kadiv => 3,
            Self::RiskOfficer => 4,
            Self::Officer => 5,
            Self::RsaEntry => 6,
            Self::Unknown => 7,
        }
    }
}
