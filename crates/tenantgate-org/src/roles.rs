//! User roles
//!
//! This module defines the three-tier role hierarchy shared by every
//! tenantgate crate.

use serde::{Deserialize, Serialize};

/// Role of a user account.
///
/// Roles are hierarchical: OrgMember < OrgAdmin < SuperAdmin.
///
/// # Permission Model
///
/// - **OrgMember**: Regular member of a single organization
/// - **OrgAdmin**: Manages members of their own organization
/// - **SuperAdmin**: Platform operator, lives in the `system` organization
///
/// # Examples
///
/// ```
/// use tenantgate_org::UserRole;
///
/// assert!(UserRole::SuperAdmin > UserRole::OrgAdmin);
/// assert!(UserRole::OrgAdmin.is_admin());
/// assert!(!UserRole::OrgMember.is_admin());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular organization member
    OrgMember = 1,

    /// Administrator of a single organization
    OrgAdmin = 2,

    /// Platform-wide administrator
    SuperAdmin = 3,
}

impl UserRole {
    /// Roles allowed to sign in through the tenant login entry point.
    pub const LOGIN_ROLES: [UserRole; 3] =
        [UserRole::OrgMember, UserRole::OrgAdmin, UserRole::SuperAdmin];

    /// Check if this role has administrative privileges (OrgAdmin or above).
    pub fn is_admin(&self) -> bool {
        *self >= UserRole::OrgAdmin
    }

    /// Check if this role is the platform super-admin.
    pub fn is_super_admin(&self) -> bool {
        *self == UserRole::SuperAdmin
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrgMember => "org_member",
            Self::OrgAdmin => "org_admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::OrgMember
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
