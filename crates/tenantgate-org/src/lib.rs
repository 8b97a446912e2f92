//! # tenantgate organization model
//!
//! Domain types shared by every tenantgate crate.
//!
//! ## Overview
//!
//! - **Organizations**: Tenants that scope username uniqueness and visibility
//! - **Users**: Accounts bound to one organization with one role
//! - **Roles**: The OrgMember < OrgAdmin < SuperAdmin hierarchy
//! - **Identity**: The verified caller threaded into privileged operations
//!
//! ## Architecture
//!
//! ```text
//! Organization ("system")
//!   └─ User (SuperAdmin)*
//! Organization (tenant)
//!   ├─ User (OrgAdmin)*
//!   └─ User (OrgMember)*
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tenantgate_org::{Organization, User, UserRole};
//!
//! let org = Organization::new("company_a", "A sample organization");
//! let user = User::new("john_doe", "$argon2id$...", "john@example.com", UserRole::OrgMember, org.id);
//! ```

pub mod identity;
pub mod organization;
pub mod roles;
pub mod user;

// Re-export main types for convenience
pub use identity::Identity;
pub use organization::{Organization, OrganizationSummary, SYSTEM_ORG_CODE};
pub use roles::UserRole;
pub use user::{User, UserProfile};
