//! # Authorization policy
//!
//! A pure decision function over the caller's identity and the operation
//! being attempted. No IO happens here; callers resolve the target record
//! first and describe it through [`Operation`].

use std::fmt;

use tenantgate_org::{Identity, UserRole};
use uuid::Uuid;

use crate::actions::Action;
use crate::permissions::{Permission, PermissionSet};
use crate::resources::ResourceType;

/// A privileged operation, described with just enough of its target to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create, list, read, update or delete organizations.
    Organization(Action),

    /// Create a new super-admin account.
    CreateAdmin,

    /// Reset passwords in general, before the target account is resolved.
    ///
    /// Checked ahead of the target lookup so that roles without the
    /// permission learn nothing about the target.
    ResetPasswordAny,

    /// Reset another account's password without proof of the old one.
    ResetPassword {
        /// Organization of the account being reset
        target_organization_id: Uuid,
        /// Role of the account being reset
        target_role: UserRole,
    },

    /// Change the password of an account with proof of the old one.
    ChangePassword {
        /// Account whose password changes
        target_user_id: Uuid,
    },
}

impl Operation {
    /// The role permission this operation requires before any scoping.
    pub fn required_permission(&self) -> Permission {
        match self {
            Operation::Organization(action) => {
                Permission::new(ResourceType::Organization, *action)
            }
            Operation::CreateAdmin => Permission::new(ResourceType::Admin, Action::Create),
            Operation::ResetPasswordAny | Operation::ResetPassword { .. } => {
                Permission::new(ResourceType::User, Action::ResetPassword)
            }
            Operation::ChangePassword { .. } => {
                Permission::new(ResourceType::User, Action::ChangePassword)
            }
        }
    }
}

/// Why an operation was denied. Only ever logged, never returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The caller's role lacks the base permission.
    MissingPermission(Permission),
    /// The target lives in another organization.
    OutsideOrganization,
    /// Organization admins cannot reset other admins.
    TargetIsAdmin,
    /// Password changes only apply to oneself.
    NotSelf,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MissingPermission(perm) => write!(f, "missing permission {}", perm),
            DenyReason::OutsideOrganization => f.write_str("target outside caller organization"),
            DenyReason::TargetIsAdmin => f.write_str("target is an administrator"),
            DenyReason::NotSelf => f.write_str("target is not the caller"),
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed.
    Permit,
    /// The operation must be refused.
    Deny(DenyReason),
}

impl Decision {
    /// Whether the operation may proceed.
    pub fn is_permitted(&self) -> bool {
        matches!(self, Decision::Permit)
    }
}

/// Decide whether `caller` may perform `operation`.
///
/// - Organization CRUD and admin creation: super-admins only
/// - Password reset: super-admins on anyone; organization admins on
///   non-admin accounts of their own organization
/// - Password change: only on oneself
///
/// # Example
///
/// ```
/// use uuid::Uuid;
/// use tenantgate_org::{Identity, UserRole};
/// use tenantgate_rbac::policy::{authorize, Decision, DenyReason, Operation};
///
/// let org = Uuid::now_v7();
/// let admin = Identity::new(Uuid::now_v7(), "boss", UserRole::OrgAdmin, org);
///
/// let member_reset = Operation::ResetPassword {
///     target_organization_id: org,
///     target_role: UserRole::OrgMember,
/// };
/// assert_eq!(authorize(&admin, &member_reset), Decision::Permit);
///
/// let other_org_reset = Operation::ResetPassword {
///     target_organization_id: Uuid::now_v7(),
///     target_role: UserRole::OrgMember,
/// };
/// assert_eq!(
///     authorize(&admin, &other_org_reset),
///     Decision::Deny(DenyReason::OutsideOrganization)
/// );
/// ```
pub fn authorize(caller: &Identity, operation: &Operation) -> Decision {
    let required = operation.required_permission();
    if !PermissionSet::for_role(caller.role).has(&required) {
        return Decision::Deny(DenyReason::MissingPermission(required));
    }

    match operation {
        Operation::Organization(_) | Operation::CreateAdmin | Operation::ResetPasswordAny => {
            Decision::Permit
        }
        Operation::ResetPassword {
            target_organization_id,
            target_role,
        } => {
            if caller.is_super_admin() {
                Decision::Permit
            } else if !caller.belongs_to(*target_organization_id) {
                Decision::Deny(DenyReason::OutsideOrganization)
            } else if target_role.is_admin() {
                Decision::Deny(DenyReason::TargetIsAdmin)
            } else {
                Decision::Permit
            }
        }
        Operation::ChangePassword { target_user_id } => {
            if caller.is_user(*target_user_id) {
                Decision::Permit
            } else {
                Decision::Deny(DenyReason::NotSelf)
            }
        }
    }
}
