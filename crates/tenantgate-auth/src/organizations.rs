//! Organization management
//!
//! CRUD over tenant organizations, restricted to super-admins.

use std::sync::Arc;

use serde::Deserialize;
use tenantgate_org::{Identity, Organization, OrganizationSummary, SYSTEM_ORG_CODE};
use tenantgate_rbac::{Action, Operation};
use tenantgate_store::{IdentityStore, OrgFilter, UserFilter};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::service::enforce;
use crate::validation::{check_description, check_org_code};

/// Organization create or update request.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationInput {
    /// Unique organization code
    pub code: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

impl OrganizationInput {
    /// Create an input from a code and description.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    fn validate(&self) -> AuthResult<()> {
        check_org_code(&self.code)?;
        check_description(&self.description)
    }
}

/// Organization service over an identity store.
pub struct OrganizationService<S: IdentityStore + ?Sized> {
    store: Arc<S>,
}

impl<S: IdentityStore + ?Sized> Clone for OrganizationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: IdentityStore + ?Sized> OrganizationService<S> {
    /// Create a new organization service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an organization.
    ///
    /// # Returns
    ///
    /// The new organization, or [`AuthError::Conflict`] if the code is taken
    #[instrument(skip(self, caller, input), fields(code = %input.code))]
    pub async fn create(
        &self,
        caller: &Identity,
        input: OrganizationInput,
    ) -> AuthResult<Organization> {
        enforce(caller, &Operation::Organization(Action::Create))?;
        input.validate()?;

        if self.code_taken(&input.code, None).await? {
            return Err(AuthError::Conflict(
                "organization code already exists".to_string(),
            ));
        }

        let org = self
            .store
            .create_org(Organization::new(input.code, input.description))
            .await?;

        info!(organization_id = %org.id, code = %org.code, "Organization created");
        Ok(org)
    }

    /// List organizations with their member counts.
    pub async fn list(&self, caller: &Identity) -> AuthResult<Vec<OrganizationSummary>> {
        enforce(caller, &Operation::Organization(Action::List))?;

        let orgs = self.store.list_orgs().await?;
        let mut summaries = Vec::with_capacity(orgs.len());
        for org in &orgs {
            let members = self
                .store
                .count_users(&UserFilter::new().organization(org.id))
                .await?;
            summaries.push(OrganizationSummary::new(org, members));
        }
        Ok(summaries)
    }

    /// Fetch one organization.
    pub async fn get(&self, caller: &Identity, id: Uuid) -> AuthResult<Organization> {
        enforce(caller, &Operation::Organization(Action::Read))?;
        self.find(id).await
    }

    /// Change an organization's code and description.
    ///
    /// The system organization keeps its code; only its description may change.
    #[instrument(skip(self, caller, input), fields(code = %input.code))]
    pub async fn update(
        &self,
        caller: &Identity,
        id: Uuid,
        input: OrganizationInput,
    ) -> AuthResult<Organization> {
        enforce(caller, &Operation::Organization(Action::Update))?;
        input.validate()?;

        let mut org = self.find(id).await?;
        if org.is_system() && input.code != SYSTEM_ORG_CODE {
            return Err(AuthError::Validation(
                "the system organization cannot be renamed".to_string(),
            ));
        }
        if input.code != org.code && self.code_taken(&input.code, Some(org.id)).await? {
            return Err(AuthError::Conflict(
                "organization code already exists".to_string(),
            ));
        }

        org.rename(input.code, input.description);
        self.store.save_org(&org).await?;

        info!(organization_id = %org.id, "Organization updated");
        Ok(org)
    }

    /// Soft-delete an organization with no remaining members.
    ///
    /// # Returns
    ///
    /// - [`AuthError::NotFound`] if the organization does not exist
    /// - [`AuthError::Conflict`] while any user belongs to it
    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Identity, id: Uuid) -> AuthResult<()> {
        enforce(caller, &Operation::Organization(Action::Delete))?;

        let org = self.find(id).await?;
        let members = self
            .store
            .count_users(&UserFilter::new().organization(org.id))
            .await?;
        if members > 0 {
            return Err(AuthError::Conflict(
                "cannot delete organization with existing users".to_string(),
            ));
        }

        self.store.delete_org(org.id).await?;

        info!(organization_id = %org.id, code = %org.code, "Organization deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AuthResult<Organization> {
        self.store
            .find_org_by_id(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("organization".to_string()))
    }

    async fn code_taken(&self, code: &str, excluding: Option<Uuid>) -> AuthResult<bool> {
        let mut filter = OrgFilter::new().code(code);
        if let Some(id) = excluding {
            filter = filter.excluding(id);
        }
        Ok(self.store.count_orgs(&filter).await? > 0)
    }
}
