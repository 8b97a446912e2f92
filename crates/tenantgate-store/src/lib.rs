//! # tenantgate identity store
//!
//! The persistence contract consumed by the authentication core, plus an
//! in-memory backend.
//!
//! ## Overview
//!
//! - **IdentityStore**: async trait for user and organization records
//! - **Filters**: backend-neutral count queries used for uniqueness checks
//! - **MemoryIdentityStore**: single-process backend (feature `memory`, on by default)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tenantgate_org::Organization;
//! use tenantgate_store::{IdentityStore, MemoryIdentityStore, OrgFilter};
//!
//! # async fn example() -> tenantgate_store::StoreResult<()> {
//! let store = MemoryIdentityStore::new();
//! store.create_org(Organization::new("company_a", "A sample organization")).await?;
//! assert_eq!(store.count_orgs(&OrgFilter::new().code("company_a")).await?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Uniqueness
//!
//! Backends enforce uniqueness inside their create operations. Callers may
//! still count first to report a friendly error, but the create is the
//! authority.

pub mod filters;
#[cfg(feature = "memory")]
pub mod memory;
pub mod store;

pub use filters::{OrgFilter, UserFilter};
#[cfg(feature = "memory")]
pub use memory::MemoryIdentityStore;
pub use store::{IdentityStore, StoreError, StoreResult};
