use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Actions enforced by menu-level policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows creating rows behind a menu.
    Create,
    /// Allows reading rows behind a menu.
    Read,
    /// Allows updating rows behind a menu.
    Update,
    /// Allows deleting rows behind a menu.
    Delete,
    /// Allows deciding approval workflow transitions.
    Approve,
}

impl Permission {
    /// Returns the bit position assigned to this permission.
    #[must_use]
    pub fn bits(&self) -> u32 {
        match self {
            Self::Create => 1,
            Self::Read => 2,
            Self::Update => 4,
            Self::Delete => 8,
            Self::Approve => 16,
        }
    }

    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Approve => "approve",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::Create,
            Permission::Read,
            Permission::Update,
            Permission::Delete,
            Permission::Approve,
        ];

        ALL
    }
}

/// Integer bitfield encoding a set of permitted actions.
///
/// Raw values outside the five defined flags are accepted as-is; containment
/// checks fall out of ordinary bitwise arithmetic and never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PermissionMask(u32);

impl PermissionMask {
    /// Mask granting nothing.
    pub const EMPTY: PermissionMask = PermissionMask(0);

    /// Mask granting every defined permission.
    pub const FULL: PermissionMask = PermissionMask(31);

    /// Creates a mask from a raw bitfield value.
    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bitfield value.
    #[must_use]
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Returns whether the mask contains the single permission flag.
    #[must_use]
    pub fn has(&self, permission: Permission) -> bool {
        (self.0 & permission.bits()) == permission.bits()
    }

    /// Returns whether the mask shares at least one bit with `other`.
    #[must_use]
    pub fn has_any(&self, other: PermissionMask) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns whether every bit of `other` is present in the mask.
    #[must_use]
    pub fn has_all(&self, other: PermissionMask) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns the mask extended with one permission flag.
    #[must_use]
    pub fn with(&self, permission: Permission) -> Self {
        Self(self.0 | permission.bits())
    }
}

impl From<Permission> for PermissionMask {
    fn from(permission: Permission) -> Self {
        Self(permission.bits())
    }
}

impl BitOr for PermissionMask {
    type Output = PermissionMask;

    fn bitor(self, rhs: PermissionMask) -> Self::Output {
        PermissionMask(self.0 | rhs.0)
    }
}
