//! # Permissions
//!
//! A permission combines a resource type with an action. Every role owns a
//! fixed permission set; the policy module layers tenant scoping on top.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use tenantgate_org::UserRole;

use crate::actions::Action;
use crate::resources::ResourceType;

/// A permission is a combination of resource type and action.
///
/// # Example
///
/// ```
/// use tenantgate_rbac::permissions::Permission;
/// use tenantgate_rbac::resources::ResourceType;
/// use tenantgate_rbac::actions::Action;
///
/// let perm = Permission::new(ResourceType::User, Action::ResetPassword);
/// assert_eq!(perm.to_string(), "user:reset_password");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    /// The resource type this permission applies to.
    pub resource: ResourceType,
    /// The action allowed on the resource.
    pub action: Action,
}

impl Permission {
    /// Create a new permission.
    pub fn new(resource: ResourceType, action: Action) -> Self {
        Self { resource, action }
    }

    /// Check if this permission grants another one.
    ///
    /// Resource types must match and the action must be equal to, or imply,
    /// the requested action.
    pub fn grants(&self, requested: &Permission) -> bool {
        self.resource == requested.resource
            && (self.action == requested.action || self.action.implies(requested.action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource.as_str(), self.action.as_str())
    }
}

/// A set of permissions held by a role.
///
/// # Example
///
/// ```
/// use tenantgate_rbac::permissions::{Permission, PermissionSet};
/// use tenantgate_rbac::resources::ResourceType;
/// use tenantgate_rbac::actions::Action;
///
/// let set: PermissionSet = [Permission::new(ResourceType::Organization, Action::Manage)]
///     .into_iter()
///     .collect();
///
/// assert!(set.has(&Permission::new(ResourceType::Organization, Action::Delete)));
/// assert!(!set.has(&Permission::new(ResourceType::User, Action::Read)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Default permission set for a role.
    ///
    /// - **SuperAdmin**: manage organizations, admins and users
    /// - **OrgAdmin**: reset passwords of users, change own password
    /// - **OrgMember**: change own password
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::SuperAdmin => [
                Permission::new(ResourceType::Organization, Action::Manage),
                Permission::new(ResourceType::Admin, Action::Create),
                Permission::new(ResourceType::User, Action::Manage),
            ]
            .into_iter()
            .collect(),
            UserRole::OrgAdmin => [
                Permission::new(ResourceType::User, Action::ResetPassword),
                Permission::new(ResourceType::User, Action::ChangePassword),
            ]
            .into_iter()
            .collect(),
            UserRole::OrgMember => [Permission::new(ResourceType::User, Action::ChangePassword)]
                .into_iter()
                .collect(),
        }
    }

    /// Check if the set grants a permission, directly or through an implied action.
    pub fn has(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
            || self.permissions.iter().any(|held| held.grants(permission))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}
