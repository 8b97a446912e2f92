//! First-run initialization
//!
//! Ensures the system organization and at least one super-admin exist.
//! Safe to run on every startup.

use serde::Serialize;
use tenantgate_org::{Organization, User, UserRole, SYSTEM_ORG_CODE};
use tenantgate_store::{IdentityStore, UserFilter};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthResult;
use crate::password::CredentialHasher;

/// What [`bootstrap`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// A super-admin already existed; nothing was written
    AlreadyInitialized,
    /// The system organization existed without admins; an admin was added
    AdminCreated {
        /// New admin's ID
        admin_id: Uuid,
    },
    /// Both the system organization and the first admin were created
    Initialized {
        /// System organization ID
        organization_id: Uuid,
        /// New admin's ID
        admin_id: Uuid,
    },
}

/// Create the system organization and first super-admin if missing.
///
/// When neither exists they are created in one atomic store call.
///
/// # Arguments
///
/// * `store` - Identity store
/// * `hasher` - Hasher for the admin password
/// * `config` - Supplies the admin username, email and password
pub async fn bootstrap<S: IdentityStore + ?Sized>(
    store: &S,
    hasher: &CredentialHasher,
    config: &AuthConfig,
) -> AuthResult<BootstrapOutcome> {
    let admins = store
        .count_users(&UserFilter::new().role(UserRole::SuperAdmin))
        .await?;
    if admins > 0 {
        info!(admins, "Super-admin present, skipping bootstrap");
        return Ok(BootstrapOutcome::AlreadyInitialized);
    }

    if config.bootstrap_password.is_none() {
        warn!(
            username = %config.bootstrap_username,
            "Bootstrap admin uses the default password; change it after first login"
        );
    }

    let digest = hasher.hash_async(config.bootstrap_password()).await?;
    let admin = User::new(
        config.bootstrap_username.as_str(),
        digest,
        config.bootstrap_email.as_str(),
        UserRole::SuperAdmin,
        Uuid::nil(),
    );

    match store.find_org_by_code(SYSTEM_ORG_CODE).await? {
        Some(system) => {
            let admin = store.create_user(admin).await?;
            info!(
                organization_id = %system.id,
                admin_id = %admin.id,
                "Created super-admin in existing system organization"
            );
            Ok(BootstrapOutcome::AdminCreated { admin_id: admin.id })
        }
        None => {
            let (system, admin) = store
                .create_org_with_user(Organization::system(), admin)
                .await?;
            info!(
                organization_id = %system.id,
                admin_id = %admin.id,
                "Created system organization and super-admin"
            );
            Ok(BootstrapOutcome::Initialized {
                organization_id: system.id,
                admin_id: admin.id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantgate_store::MemoryIdentityStore;

    fn config() -> AuthConfig {
        AuthConfig {
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..AuthConfig::with_secret("unit-test-secret")
        }
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let store = MemoryIdentityStore::new();
        let config = config();
        let hasher = CredentialHasher::new(&config).unwrap();

        let first = bootstrap(&store, &hasher, &config).await.unwrap();
        let BootstrapOutcome::Initialized {
            organization_id,
            admin_id,
        } = first
        else {
            panic!("expected initialization, got {:?}", first);
        };

        let system = store.find_org_by_code(SYSTEM_ORG_CODE).await.unwrap().unwrap();
        assert_eq!(system.id, organization_id);
        assert_eq!(system.description, "System Organization");

        let admin = store.find_user_by_id(admin_id).await.unwrap().unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.email, "admin@system.com");
        assert_eq!(admin.organization_id, system.id);
        assert!(hasher.verify(admin.password_hash(), "admin"));

        let second = bootstrap(&store, &hasher, &config).await.unwrap();
        assert_eq!(second, BootstrapOutcome::AlreadyInitialized);
    }

    #[tokio::test]
    async fn test_bootstrap_reuses_existing_system_org() {
        let store = MemoryIdentityStore::new();
        let system = store.create_org(Organization::system()).await.unwrap();
        let config = AuthConfig {
            bootstrap_password: Some("configured-pw".to_string()),
            ..config()
        };
        let hasher = CredentialHasher::new(&config).unwrap();

        let outcome = bootstrap(&store, &hasher, &config).await.unwrap();
        let BootstrapOutcome::AdminCreated { admin_id } = outcome else {
            panic!("expected admin creation, got {:?}", outcome);
        };

        let admin = store.find_user_by_id(admin_id).await.unwrap().unwrap();
        assert_eq!(admin.organization_id, system.id);
        assert!(hasher.verify(admin.password_hash(), "configured-pw"));
    }
}
