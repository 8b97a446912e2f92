//! # tenantgate RBAC (Role-Based Access Control)
//!
//! Role permissions and the authorization policy that gates every mutating
//! tenantgate operation.
//!
//! ## Overview
//!
//! - **Resources**: Organization, User, Admin
//! - **Actions**: CRUD plus password change/reset
//! - **Permissions**: Resource + Action combinations, grouped per role
//! - **Policy**: Role permissions plus tenant scoping, as a pure function
//!
//! ## Architecture
//!
//! ```text
//! authorize(caller, operation)
//!   ├─ PermissionSet::for_role(caller.role) has operation.required_permission()?
//!   └─ tenant scoping (same organization, target role, self)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tenantgate_org::{Identity, UserRole};
//! use tenantgate_rbac::{authorize, Action, Operation};
//! use uuid::Uuid;
//!
//! let caller = Identity::new(Uuid::now_v7(), "admin", UserRole::SuperAdmin, Uuid::now_v7());
//! assert!(authorize(&caller, &Operation::Organization(Action::Delete)).is_permitted());
//! ```
//!
//! Denials carry a [`DenyReason`] for logging. Callers surface every denial
//! as the same generic error.

pub mod actions;
pub mod permissions;
pub mod policy;
pub mod resources;

// Re-export main types for convenience
pub use actions::Action;
pub use permissions::{Permission, PermissionSet};
pub use policy::{authorize, Decision, DenyReason, Operation};
pub use resources::ResourceType;
