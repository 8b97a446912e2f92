//! Authentication workflows
//!
//! [`AuthService`] ties the credential hasher, the token service, the
//! authorization policy and an [`IdentityStore`] together into the
//! login, registration and account operations.
//!
//! Login failures never reveal which part of the credentials was wrong:
//! an unknown organization, an unknown user and a wrong password all return
//! [`AuthError::InvalidCredentials`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenantgate_org::{Identity, Organization, User, UserProfile, UserRole, SYSTEM_ORG_CODE};
use tenantgate_rbac::{authorize, Decision, Operation};
use tenantgate_store::{IdentityStore, UserFilter};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::bearer;
use crate::bootstrap::{self, BootstrapOutcome};
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::jwt::{IssuedToken, TokenService};
use crate::password::CredentialHasher;
use crate::validation::{check_email, require, CredentialPolicy};

/// Plaintext hashed once at startup so that logins for unknown accounts
/// spend the same verification time as logins with a wrong password.
const TIMING_DUMMY_PASSWORD: &str = "tenantgate-timing-dummy";

/// How a tenant login names its organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgSelector {
    /// By organization ID
    Id(Uuid),
    /// By organization code
    Code(String),
}

/// Tenant login request.
#[derive(Clone, Deserialize)]
pub struct LoginInput {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Organization to log into
    pub organization: OrgSelector,
}

/// Self-service registration request.
#[derive(Clone, Deserialize)]
pub struct RegisterInput {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Contact email
    pub email: String,
    /// Organization to join
    pub organization_id: Uuid,
}

/// Super-admin creation request.
#[derive(Clone, Deserialize)]
pub struct CreateAdminInput {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Contact email
    pub email: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutput {
    /// Signed access token
    pub token: String,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
    /// Authenticated user
    pub user_id: Uuid,
    /// Authenticated username
    pub username: String,
    /// Authenticated role
    pub role: UserRole,
    /// User's organization
    pub organization_id: Uuid,
    /// User's organization code
    pub organization_code: String,
}

impl LoginOutput {
    fn new(issued: IssuedToken, user: &User, organization_code: &str) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            organization_id: user.organization_id,
            organization_code: organization_code.to_string(),
        }
    }
}

/// The caller's own account as currently stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    /// Account details
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Code of the account's organization
    pub organization_code: String,
}

/// Check the policy and turn a denial into [`AuthError::Forbidden`].
///
/// The deny reason is logged and never returned.
pub(crate) fn enforce(caller: &Identity, operation: &Operation) -> AuthResult<()> {
    match authorize(caller, operation) {
        Decision::Permit => Ok(()),
        Decision::Deny(reason) => {
            warn!(
                user_id = %caller.user_id,
                role = %caller.role,
                reason = %reason,
                "Authorization denied"
            );
            Err(AuthError::Forbidden)
        }
    }
}

/// Authentication service over an identity store.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tenantgate_auth::{AuthConfig, AuthService, LoginInput, OrgSelector};
/// use tenantgate_store::MemoryIdentityStore;
///
/// # async fn example() -> tenantgate_auth::AuthResult<()> {
/// let service = AuthService::new(Arc::new(MemoryIdentityStore::new()), AuthConfig::from_env())?;
/// service.bootstrap().await?;
///
/// let login = service
///     .login(LoginInput {
///         username: "alice".to_string(),
///         password: "secret1".to_string(),
///         organization: OrgSelector::Code("company_a".to_string()),
///     })
///     .await?;
/// let caller = service.authenticate(Some(&format!("Bearer {}", login.token)))?;
/// # Ok(())
/// # }
/// ```
pub struct AuthService<S: IdentityStore + ?Sized> {
    pub(crate) store: Arc<S>,
    pub(crate) tokens: TokenService,
    pub(crate) hasher: CredentialHasher,
    pub(crate) policy: CredentialPolicy,
    config: AuthConfig,
    timing_dummy: String,
}

impl<S: IdentityStore + ?Sized> std::fmt::Debug for AuthService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .field("hasher", &self.hasher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: IdentityStore + ?Sized> AuthService<S> {
    /// Create a new authentication service.
    ///
    /// # Arguments
    ///
    /// * `store` - Identity store backend
    /// * `config` - Authentication configuration
    ///
    /// # Returns
    ///
    /// Service or configuration error
    pub fn new(store: Arc<S>, config: AuthConfig) -> AuthResult<Self> {
        config.validate()?;
        let tokens = TokenService::new(&config)?;
        let hasher = CredentialHasher::new(&config)?;
        let timing_dummy = hasher.hash(TIMING_DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            tokens,
            hasher,
            policy: CredentialPolicy::from_config(&config),
            config,
            timing_dummy,
        })
    }

    /// The token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// The credential hasher.
    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    /// The identity store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verify the bearer token in an `Authorization` header.
    pub fn authenticate(&self, header: Option<&str>) -> AuthResult<Identity> {
        bearer::authenticate(&self.tokens, header)
    }

    /// Create the system organization and first super-admin if missing.
    pub async fn bootstrap(&self) -> AuthResult<BootstrapOutcome> {
        bootstrap::bootstrap(self.store.as_ref(), &self.hasher, &self.config).await
    }

    /// Log into an organization.
    ///
    /// # Returns
    ///
    /// Token and account summary, or [`AuthError::InvalidCredentials`]
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        require("username", &input.username)?;
        require("password", &input.password)?;

        let org = match &input.organization {
            OrgSelector::Id(id) => self.store.find_org_by_id(*id).await?,
            OrgSelector::Code(code) => {
                require("organization code", code)?;
                self.store.find_org_by_code(code).await?
            }
        };

        let Some(org) = org else {
            debug!("Login for unknown organization");
            self.equalize_timing(&input.password).await;
            return Err(AuthError::InvalidCredentials);
        };

        self.login_into(&org, &input.username, &input.password, &UserRole::LOGIN_ROLES)
            .await
    }

    /// Log into the system organization as a super-admin.
    #[instrument(skip(self, password))]
    pub async fn admin_login(&self, username: &str, password: &str) -> AuthResult<LoginOutput> {
        require("username", username)?;
        require("password", password)?;

        let Some(system) = self.store.find_org_by_code(SYSTEM_ORG_CODE).await? else {
            error!("System organization is missing; has bootstrap run?");
            self.equalize_timing(password).await;
            return Err(AuthError::InvalidCredentials);
        };

        self.login_into(&system, username, password, &[UserRole::SuperAdmin])
            .await
    }

    async fn login_into(
        &self,
        org: &Organization,
        username: &str,
        password: &str,
        roles: &[UserRole],
    ) -> AuthResult<LoginOutput> {
        let user = self
            .store
            .find_user_by_username_org_role(username, org.id, roles)
            .await?;

        let Some(user) = user else {
            debug!(organization = %org.code, "Login for unknown user");
            self.equalize_timing(password).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify_async(user.password_hash(), password).await {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self
            .tokens
            .issue(user.id, &user.username, user.role, user.organization_id)?;

        info!(user_id = %user.id, organization = %org.code, "User logged in");
        Ok(LoginOutput::new(issued, &user, &org.code))
    }

    async fn equalize_timing(&self, password: &str) {
        let _ = self.hasher.verify_async(&self.timing_dummy, password).await;
    }

    /// Register a new member of a tenant organization.
    ///
    /// Registration doubles as login: the new account gets a token.
    #[instrument(skip(self, input), fields(username = %input.username, organization_id = %input.organization_id))]
    pub async fn register(&self, input: RegisterInput) -> AuthResult<LoginOutput> {
        self.policy.check_username(&input.username)?;
        self.policy.check_password(&input.password)?;
        check_email(&input.email)?;
        if input.organization_id.is_nil() {
            return Err(AuthError::Validation(
                "organization_id is required".to_string(),
            ));
        }

        let org = self
            .store
            .find_org_by_id(input.organization_id)
            .await?
            .ok_or_else(|| AuthError::Validation("organization does not exist".to_string()))?;
        if org.is_system() {
            return Err(AuthError::Validation(
                "cannot register in the system organization".to_string(),
            ));
        }

        let taken = self
            .store
            .count_users(
                &UserFilter::new()
                    .username(input.username.as_str())
                    .email(input.email.as_str())
                    .organization(org.id),
            )
            .await?;
        if taken > 0 {
            return Err(AuthError::Conflict(
                "username or email already exists in this organization".to_string(),
            ));
        }

        let digest = self.hasher.hash_async(&input.password).await?;
        let user = self
            .store
            .create_user(User::new(
                input.username,
                digest,
                input.email,
                UserRole::OrgMember,
                org.id,
            ))
            .await?;

        let issued = self
            .tokens
            .issue(user.id, &user.username, user.role, user.organization_id)?;

        info!(user_id = %user.id, organization = %org.code, "User registered");
        Ok(LoginOutput::new(issued, &user, &org.code))
    }

    /// Create another super-admin. Only super-admins may call this.
    #[instrument(skip(self, caller, input), fields(caller = %caller.user_id, username = %input.username))]
    pub async fn create_admin(
        &self,
        caller: &Identity,
        input: CreateAdminInput,
    ) -> AuthResult<UserProfile> {
        enforce(caller, &Operation::CreateAdmin)?;

        self.policy.check_username(&input.username)?;
        self.policy.check_password(&input.password)?;
        check_email(&input.email)?;

        let taken = self
            .store
            .count_users(
                &UserFilter::new()
                    .username(input.username.as_str())
                    .role(UserRole::SuperAdmin),
            )
            .await?;
        if taken > 0 {
            return Err(AuthError::Conflict("admin username already exists".to_string()));
        }

        let digest = self.hasher.hash_async(&input.password).await?;
        // The store binds super-admins to the system organization.
        let admin = self
            .store
            .create_user(User::new(
                input.username,
                digest,
                input.email,
                UserRole::SuperAdmin,
                Uuid::nil(),
            ))
            .await?;

        info!(admin_id = %admin.id, "Super-admin created");
        Ok(admin.profile())
    }

    /// Look up the caller's own account.
    pub async fn current_user(&self, caller: &Identity) -> AuthResult<CurrentUser> {
        let user = self
            .store
            .find_user_by_id(caller.user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("user".to_string()))?;

        let org = self
            .store
            .find_org_by_id(user.organization_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("organization".to_string()))?;

        Ok(CurrentUser {
            profile: user.profile(),
            organization_code: org.code,
        })
    }
}
