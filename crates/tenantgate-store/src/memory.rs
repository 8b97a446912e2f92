//! In-memory identity store
//!
//! Suitable for single-process deployments and tests. Every mutation runs
//! under one write lock, so checks and inserts are atomic with respect to
//! each other.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tenantgate_org::{Organization, User, UserRole, SYSTEM_ORG_CODE};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::filters::{OrgFilter, UserFilter};
use crate::store::{IdentityStore, StoreError, StoreResult};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    orgs: HashMap<Uuid, Organization>,
}

impl MemoryState {
    fn active_org(&self, id: Uuid) -> Option<&Organization> {
        self.orgs.get(&id).filter(|org| org.is_active())
    }

    fn active_org_by_code(&self, code: &str) -> Option<&Organization> {
        self.orgs
            .values()
            .find(|org| org.is_active() && org.code == code)
    }

    fn member_count(&self, org_id: Uuid) -> usize {
        self.users
            .values()
            .filter(|user| user.is_active() && user.organization_id == org_id)
            .count()
    }

    fn ensure_code_free(&self, code: &str, except: Option<Uuid>) -> StoreResult<()> {
        let filter = OrgFilter {
            code: Some(code.to_string()),
            exclude_id: except,
        };
        if self.orgs.values().any(|org| filter.matches(org)) {
            return Err(StoreError::Conflict(format!(
                "organization code '{}' already exists",
                code
            )));
        }
        Ok(())
    }

    /// Apply the user invariants, taking an organization that is about to be
    /// inserted in the same transaction into account.
    fn prepare_user(&self, mut user: User, staged: Option<&Organization>) -> StoreResult<User> {
        let staged_active = staged.filter(|org| org.is_active());

        if user.role == UserRole::SuperAdmin {
            let system_id = staged_active
                .filter(|org| org.is_system())
                .map(|org| org.id)
                .or_else(|| self.active_org_by_code(SYSTEM_ORG_CODE).map(|org| org.id))
                .ok_or_else(|| {
                    StoreError::Invariant("system organization not found".to_string())
                })?;
            user.organization_id = system_id;
        } else {
            if user.organization_id.is_nil() {
                return Err(StoreError::Invariant(
                    "organization_id is required for non-super-admin users".to_string(),
                ));
            }
            let known = staged_active.map_or(false, |org| org.id == user.organization_id)
                || self.active_org(user.organization_id).is_some();
            if !known {
                return Err(StoreError::Invariant(format!(
                    "organization {} does not exist",
                    user.organization_id
                )));
            }
        }

        let duplicate = UserFilter::new()
            .username(user.username.clone())
            .email(user.email.clone())
            .organization(user.organization_id);
        if self.users.values().any(|existing| duplicate.matches(existing)) {
            return Err(StoreError::Conflict(
                "username or email already exists in this organization".to_string(),
            ));
        }

        Ok(user)
    }
}

/// In-memory [`IdentityStore`] implementation.
///
/// Cloning is cheap and clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    state: Arc<RwLock<MemoryState>>,
}

impl std::fmt::Debug for MemoryIdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIdentityStore").finish_non_exhaustive()
    }
}

impl MemoryIdentityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).filter(|user| user.is_active()).cloned())
    }

    async fn find_user_by_username_org_role(
        &self,
        username: &str,
        organization_id: Uuid,
        roles: &[UserRole],
    ) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| {
                user.is_active()
                    && user.username == username
                    && user.organization_id == organization_id
                    && roles.contains(&user.role)
            })
            .cloned())
    }

    async fn find_org_by_code(&self, code: &str) -> StoreResult<Option<Organization>> {
        let state = self.state.read().await;
        Ok(state.active_org_by_code(code).cloned())
    }

    async fn find_org_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>> {
        let state = self.state.read().await;
        Ok(state.active_org(id).cloned())
    }

    async fn list_orgs(&self) -> StoreResult<Vec<Organization>> {
        let state = self.state.read().await;
        let mut orgs: Vec<Organization> = state
            .orgs
            .values()
            .filter(|org| org.is_active())
            .cloned()
            .collect();
        orgs.sort_by_key(|org| org.created_at);
        Ok(orgs)
    }

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64> {
        let state = self.state.read().await;
        Ok(state.users.values().filter(|user| filter.matches(user)).count() as u64)
    }

    async fn count_orgs(&self, filter: &OrgFilter) -> StoreResult<u64> {
        let state = self.state.read().await;
        Ok(state.orgs.values().filter(|org| filter.matches(org)).count() as u64)
    }

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.id)));
        }

        let user = state.prepare_user(user, None)?;
        tracing::debug!(
            user_id = %user.id,
            organization_id = %user.organization_id,
            role = %user.role,
            "Created user"
        );
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.id) {
            Some(existing) if existing.is_active() => {
                *existing = user.clone();
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                entity: "user",
                id: user.id.to_string(),
            }),
        }
    }

    async fn create_org(&self, org: Organization) -> StoreResult<Organization> {
        let mut state = self.state.write().await;
        if state.orgs.contains_key(&org.id) {
            return Err(StoreError::Conflict(format!(
                "organization {} already exists",
                org.id
            )));
        }
        state.ensure_code_free(&org.code, None)?;

        tracing::debug!(organization_id = %org.id, code = %org.code, "Created organization");
        state.orgs.insert(org.id, org.clone());
        Ok(org)
    }

    async fn save_org(&self, org: &Organization) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.active_org(org.id).is_none() {
            return Err(StoreError::NotFound {
                entity: "organization",
                id: org.id.to_string(),
            });
        }
        state.ensure_code_free(&org.code, Some(org.id))?;
        state.orgs.insert(org.id, org.clone());
        Ok(())
    }

    async fn delete_org(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.active_org(id).is_none() {
            return Err(StoreError::NotFound {
                entity: "organization",
                id: id.to_string(),
            });
        }

        let members = state.member_count(id);
        if members > 0 {
            return Err(StoreError::Conflict(format!(
                "organization still has {} user(s)",
                members
            )));
        }

        if let Some(org) = state.orgs.get_mut(&id) {
            org.soft_delete();
        }
        tracing::debug!(organization_id = %id, "Soft-deleted organization");
        Ok(())
    }

    async fn create_org_with_user(
        &self,
        org: Organization,
        user: User,
    ) -> StoreResult<(Organization, User)> {
        let mut state = self.state.write().await;
        if state.orgs.contains_key(&org.id) {
            return Err(StoreError::Conflict(format!(
                "organization {} already exists",
                org.id
            )));
        }
        if state.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.id)));
        }
        state.ensure_code_free(&org.code, None)?;
        let user = state.prepare_user(user, Some(&org))?;

        // Both checks passed; commit together.
        state.orgs.insert(org.id, org.clone());
        state.users.insert(user.id, user.clone());
        tracing::debug!(
            organization_id = %org.id,
            user_id = %user.id,
            "Created organization with initial user"
        );
        Ok((org, user))
    }
}
