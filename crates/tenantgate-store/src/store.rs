//! Identity store abstraction
//!
//! This module defines the narrow persistence contract the authentication
//! core relies on. Backends must enforce username/email uniqueness per
//! organization and code uniqueness across organizations inside their
//! create operations, not only through the count queries.

use async_trait::async_trait;
use tenantgate_org::{Organization, User, UserRole};
use thiserror::Error;
use uuid::Uuid;

use crate::filters::{OrgFilter, UserFilter};

/// Identity store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record does not exist (or is soft-deleted)
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Requested identifier
        id: String,
    },

    /// Uniqueness constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referential or role invariant violated
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Backend failure (connection, query, serialization)
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result type for identity store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for users and organizations.
///
/// Lookups ignore soft-deleted records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find an active user by ID.
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Find an active user by username within an organization, restricted to `roles`.
    async fn find_user_by_username_org_role(
        &self,
        username: &str,
        organization_id: Uuid,
        roles: &[UserRole],
    ) -> StoreResult<Option<User>>;

    /// Find an active organization by code.
    async fn find_org_by_code(&self, code: &str) -> StoreResult<Option<Organization>>;

    /// Find an active organization by ID.
    async fn find_org_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>>;

    /// List active organizations, oldest first.
    async fn list_orgs(&self) -> StoreResult<Vec<Organization>>;

    /// Count active users matching a filter.
    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64>;

    /// Count active organizations matching a filter.
    async fn count_orgs(&self, filter: &OrgFilter) -> StoreResult<u64>;

    /// Insert a new user.
    ///
    /// Super-admins are bound to the system organization regardless of the
    /// `organization_id` supplied. Other roles must reference an existing
    /// organization. Fails with [`StoreError::Conflict`] when the username or
    /// email is already used in the organization.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Persist changes to an existing user.
    async fn save_user(&self, user: &User) -> StoreResult<()>;

    /// Insert a new organization. Fails with [`StoreError::Conflict`] on a duplicate code.
    async fn create_org(&self, org: Organization) -> StoreResult<Organization>;

    /// Persist changes to an existing organization.
    async fn save_org(&self, org: &Organization) -> StoreResult<()>;

    /// Soft-delete an organization. Fails with [`StoreError::Conflict`] while users reference it.
    async fn delete_org(&self, id: Uuid) -> StoreResult<()>;

    /// Insert an organization and a user atomically: both or neither.
    async fn create_org_with_user(
        &self,
        org: Organization,
        user: User,
    ) -> StoreResult<(Organization, User)>;
}
