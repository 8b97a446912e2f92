//! # tenantgate authentication
//!
//! Authentication, account and organization workflows for a multi-tenant
//! backend.
//!
//! ## Overview
//!
//! - **Credential hashing**: Argon2id digests with per-password salts
//! - **Tokens**: HS256 access tokens carrying the caller's identity
//! - **Workflows**: tenant login, admin login, registration, admin creation
//! - **Password lifecycle**: change with proof, reset under policy
//! - **Organizations**: super-admin CRUD over tenants
//! - **Bootstrap**: first-run creation of the system organization and admin
//!
//! Authorization decisions come from `tenantgate-rbac`; persistence goes
//! through the `tenantgate-store` [`IdentityStore`](tenantgate_store::IdentityStore) trait.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tenantgate_auth::{AuthConfig, AuthService, OrganizationInput, OrganizationService};
//! use tenantgate_store::MemoryIdentityStore;
//!
//! # async fn example() -> tenantgate_auth::AuthResult<()> {
//! let store = Arc::new(MemoryIdentityStore::new());
//! let auth = AuthService::new(store.clone(), AuthConfig::from_env())?;
//! let orgs = OrganizationService::new(store);
//!
//! auth.bootstrap().await?;
//! let admin = auth.admin_login("admin", "admin").await?;
//! let caller = auth.authenticate(Some(&format!("Bearer {}", admin.token)))?;
//!
//! orgs.create(&caller, OrganizationInput::new("company_a", "A sample organization"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`AuthResult`]. Login failures collapse to
//! [`AuthError::InvalidCredentials`], token failures to
//! [`AuthError::InvalidToken`] and policy denials to [`AuthError::Forbidden`].

pub mod bearer;
pub mod bootstrap;
pub mod claims;
pub mod config;
pub mod error;
pub mod jwt;
mod lifecycle;
pub mod organizations;
pub mod password;
pub mod service;
pub mod validation;

// Re-exports
pub use bearer::{authenticate, extract_bearer};
pub use bootstrap::{bootstrap, BootstrapOutcome};
pub use claims::Claims;
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult, ErrorResponse, TokenRejection};
pub use jwt::{IssuedToken, TokenService};
pub use organizations::{OrganizationInput, OrganizationService};
pub use password::CredentialHasher;
pub use service::{
    AuthService, CreateAdminInput, CurrentUser, LoginInput, LoginOutput, OrgSelector,
    RegisterInput,
};
pub use validation::CredentialPolicy;
