//! Authenticated caller identity
//!
//! This module provides the `Identity` type that request handlers thread
//! into every privileged operation once a bearer token has been verified.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::UserRole;
use crate::user::User;

/// The verified identity of the caller of an operation.
///
/// Built from token claims, so it reflects the account as it was when the
/// token was issued.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use tenantgate_org::{Identity, UserRole};
///
/// let org_id = Uuid::now_v7();
/// let caller = Identity::new(Uuid::now_v7(), "root", UserRole::SuperAdmin, org_id);
/// assert!(caller.is_super_admin());
/// assert!(caller.belongs_to(org_id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Caller's user ID
    pub user_id: Uuid,

    /// Caller's username
    pub username: String,

    /// Caller's role
    pub role: UserRole,

    /// Caller's organization
    pub organization_id: Uuid,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        role: UserRole,
        organization_id: Uuid,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
            organization_id,
        }
    }

    /// Whether the caller is a super-admin.
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Whether the caller belongs to the given organization.
    pub fn belongs_to(&self, organization_id: Uuid) -> bool {
        self.organization_id == organization_id
    }

    /// Whether the caller is the given user.
    pub fn is_user(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role, user.organization_id)
    }
}
