//! End-to-end tests for the authentication workflows.
//!
//! Each test builds a fresh in-memory deployment: bootstrap, a super-admin
//! session and two tenant organizations. The tests then drive the public
//! API the way request handlers would, bearer headers included.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tenantgate_auth::{
    AuthConfig, AuthError, AuthService, BootstrapOutcome, CreateAdminInput, LoginInput,
    LoginOutput, OrgSelector, OrganizationInput, OrganizationService, RegisterInput,
};
use tenantgate_org::{Identity, Organization, UserRole};
use tenantgate_store::{IdentityStore, MemoryIdentityStore};
use uuid::Uuid;

/// Test fixture with a bootstrapped store and two tenants.
struct TestFixture {
    /// Authentication service under test.
    auth: AuthService<MemoryIdentityStore>,
    /// Organization service sharing the same store.
    orgs: OrganizationService<MemoryIdentityStore>,
    /// Identity of the bootstrap super-admin.
    root: Identity,
    /// First tenant.
    company_a: Organization,
    /// Second tenant.
    company_b: Organization,
}

impl TestFixture {
    async fn new() -> Self {
        let config = AuthConfig {
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..AuthConfig::with_secret("integration-test-secret")
        };
        let store = Arc::new(MemoryIdentityStore::new());
        let auth = AuthService::new(store.clone(), config).unwrap();
        let orgs = OrganizationService::new(store);

        let outcome = auth.bootstrap().await.unwrap();
        assert!(matches!(outcome, BootstrapOutcome::Initialized { .. }));

        let login = auth.admin_login("admin", "admin").await.unwrap();
        let root = auth.authenticate(Some(&bearer(&login))).unwrap();

        let company_a = orgs
            .create(&root, OrganizationInput::new("company_a", "Company A"))
            .await
            .unwrap();
        let company_b = orgs
            .create(&root, OrganizationInput::new("company_b", "Company B"))
            .await
            .unwrap();

        Self {
            auth,
            orgs,
            root,
            company_a,
            company_b,
        }
    }

    async fn register(&self, username: &str, org: &Organization) -> LoginOutput {
        self.auth
            .register(RegisterInput {
                username: username.to_string(),
                password: "secret1".to_string(),
                email: format!("{}@example.com", username),
                organization_id: org.id,
            })
            .await
            .unwrap()
    }

    async fn login(
        &self,
        username: &str,
        password: &str,
        org: &Organization,
    ) -> Result<LoginOutput, AuthError> {
        self.auth
            .login(LoginInput {
                username: username.to_string(),
                password: password.to_string(),
                organization: OrgSelector::Id(org.id),
            })
            .await
    }

    /// Promote a registered member to organization admin and return its identity.
    async fn promote(&self, login: &LoginOutput) -> Identity {
        let store = self.auth.store();
        let mut user = store.find_user_by_id(login.user_id).await.unwrap().unwrap();
        user.role = UserRole::OrgAdmin;
        store.save_user(&user).await.unwrap();

        let relogin = self
            .login(&user.username, "secret1", &self.org_of(&user.organization_id))
            .await
            .unwrap();
        self.identity(&relogin)
    }

    fn org_of(&self, id: &Uuid) -> Organization {
        if *id == self.company_a.id {
            self.company_a.clone()
        } else {
            self.company_b.clone()
        }
    }

    fn identity(&self, login: &LoginOutput) -> Identity {
        self.auth.authenticate(Some(&bearer(login))).unwrap()
    }
}

fn bearer(login: &LoginOutput) -> String {
    format!("Bearer {}", login.token)
}

// ============================================================================
// Login and registration
// ============================================================================

#[tokio::test]
async fn test_same_username_in_two_organizations() {
    let fx = TestFixture::new().await;
    let a = fx.register("alice", &fx.company_a).await;
    let b = fx.register("alice", &fx.company_b).await;
    assert_ne!(a.user_id, b.user_id);

    let duplicate = fx
        .auth
        .register(RegisterInput {
            username: "alice".to_string(),
            password: "secret1".to_string(),
            email: "other@example.com".to_string(),
            organization_id: fx.company_a.id,
        })
        .await;
    assert!(matches!(duplicate, Err(AuthError::Conflict(_))));

    let login_b = fx.login("alice", "secret1", &fx.company_b).await.unwrap();
    assert_eq!(login_b.user_id, b.user_id);
    assert_eq!(login_b.organization_code, "company_b");
}

#[tokio::test]
async fn test_duplicate_email_in_organization_conflicts() {
    let fx = TestFixture::new().await;
    fx.register("alice", &fx.company_a).await;

    let result = fx
        .auth
        .register(RegisterInput {
            username: "alicia".to_string(),
            password: "secret1".to_string(),
            email: "alice@example.com".to_string(),
            organization_id: fx.company_a.id,
        })
        .await;
    assert!(matches!(result, Err(AuthError::Conflict(_))));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let fx = TestFixture::new().await;
    fx.register("alice", &fx.company_a).await;

    let wrong_password = fx.login("alice", "wrong-password", &fx.company_a).await;
    let unknown_user = fx.login("mallory", "secret1", &fx.company_a).await;
    let wrong_org = fx.login("alice", "secret1", &fx.company_b).await;
    let unknown_org = fx
        .auth
        .login(LoginInput {
            username: "alice".to_string(),
            password: "secret1".to_string(),
            organization: OrgSelector::Code("nowhere".to_string()),
        })
        .await;

    for result in [wrong_password, unknown_user, wrong_org, unknown_org] {
        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}

#[tokio::test]
async fn test_register_into_system_org_rejected() {
    let fx = TestFixture::new().await;
    let result = fx
        .auth
        .register(RegisterInput {
            username: "sneaky".to_string(),
            password: "secret1".to_string(),
            email: "sneaky@example.com".to_string(),
            organization_id: fx.root.organization_id,
        })
        .await;
    assert!(matches!(result, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn test_register_into_unknown_org_rejected() {
    let fx = TestFixture::new().await;
    let result = fx
        .auth
        .register(RegisterInput {
            username: "alice".to_string(),
            password: "secret1".to_string(),
            email: "alice@example.com".to_string(),
            organization_id: Uuid::now_v7(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn test_register_validates_input() {
    let fx = TestFixture::new().await;
    let short_password = fx
        .auth
        .register(RegisterInput {
            username: "alice".to_string(),
            password: "12345".to_string(),
            email: "alice@example.com".to_string(),
            organization_id: fx.company_a.id,
        })
        .await;
    assert!(matches!(short_password, Err(AuthError::Validation(_))));

    let bad_email = fx
        .auth
        .register(RegisterInput {
            username: "alice".to_string(),
            password: "secret1".to_string(),
            email: "not-an-email".to_string(),
            organization_id: fx.company_a.id,
        })
        .await;
    assert!(matches!(bad_email, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn test_tenant_user_cannot_use_admin_login() {
    let fx = TestFixture::new().await;
    fx.register("alice", &fx.company_a).await;

    let result = fx.auth.admin_login("alice", "secret1").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_admin_login_failures_are_indistinguishable() {
    let fx = TestFixture::new().await;

    let wrong_password = fx.auth.admin_login("admin", "not-the-password").await;
    let unknown_admin = fx.auth.admin_login("nobody", "admin").await;

    let wrong_password = wrong_password.unwrap_err();
    let unknown_admin = unknown_admin.unwrap_err();
    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_admin, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_admin.to_string());
    assert_eq!(wrong_password.error_code(), unknown_admin.error_code());
}

// ============================================================================
// Admin management
// ============================================================================

#[tokio::test]
async fn test_create_admin() {
    let fx = TestFixture::new().await;
    let profile = fx
        .auth
        .create_admin(
            &fx.root,
            CreateAdminInput {
                username: "root2".to_string(),
                password: "secret1".to_string(),
                email: "root2@system.com".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.role, UserRole::SuperAdmin);
    assert_eq!(profile.organization_id, fx.root.organization_id);

    let login = fx.auth.admin_login("root2", "secret1").await.unwrap();
    assert_eq!(login.organization_code, "system");

    let duplicate = fx
        .auth
        .create_admin(
            &fx.root,
            CreateAdminInput {
                username: "root2".to_string(),
                password: "secret1".to_string(),
                email: "root3@system.com".to_string(),
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AuthError::Conflict(_))));
}

#[tokio::test]
async fn test_org_admin_cannot_create_admin() {
    let fx = TestFixture::new().await;
    let login = fx.register("boss", &fx.company_a).await;
    let boss = fx.promote(&login).await;

    let result = fx
        .auth
        .create_admin(
            &boss,
            CreateAdminInput {
                username: "usurper".to_string(),
                password: "secret1".to_string(),
                email: "usurper@example.com".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AuthError::Forbidden)));
}

// ============================================================================
// Password lifecycle
// ============================================================================

#[tokio::test]
async fn test_change_password_flow() {
    let fx = TestFixture::new().await;
    let login = fx.register("alice", &fx.company_a).await;
    let alice = fx.identity(&login);

    let issued = fx
        .auth
        .change_password(&alice, "secret1", "secret2")
        .await
        .unwrap();
    assert!(fx.auth.tokens().verify(&issued.token).is_ok());

    assert!(matches!(
        fx.login("alice", "secret1", &fx.company_a).await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(fx.login("alice", "secret2", &fx.company_a).await.is_ok());
}

#[tokio::test]
async fn test_change_password_to_same_value_rejected() {
    let fx = TestFixture::new().await;
    let login = fx.register("alice", &fx.company_a).await;
    let alice = fx.identity(&login);

    let result = fx.auth.change_password(&alice, "secret1", "secret1").await;
    assert!(matches!(result, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn test_change_password_requires_old() {
    let fx = TestFixture::new().await;
    let login = fx.register("alice", &fx.company_a).await;
    let alice = fx.identity(&login);

    let result = fx
        .auth
        .change_password(&alice, "not-my-password", "secret2")
        .await;
    assert!(matches!(result, Err(AuthError::InvalidOldPassword)));
}

#[tokio::test]
async fn test_org_admin_reset_scope() {
    let fx = TestFixture::new().await;
    let boss = fx.promote(&fx.register("boss", &fx.company_a).await).await;
    let member = fx.register("alice", &fx.company_a).await;
    let peer_admin = fx.register("deputy", &fx.company_a).await;
    fx.promote(&peer_admin).await;
    let outsider = fx.register("bob", &fx.company_b).await;

    fx.auth
        .reset_password(&boss, member.user_id, "fresh-pass")
        .await
        .unwrap();
    assert!(fx.login("alice", "fresh-pass", &fx.company_a).await.is_ok());

    assert!(matches!(
        fx.auth
            .reset_password(&boss, outsider.user_id, "fresh-pass")
            .await,
        Err(AuthError::Forbidden)
    ));
    assert!(matches!(
        fx.auth
            .reset_password(&boss, peer_admin.user_id, "fresh-pass")
            .await,
        Err(AuthError::Forbidden)
    ));
    assert!(fx.login("bob", "secret1", &fx.company_b).await.is_ok());
}

#[tokio::test]
async fn test_super_admin_resets_anyone() {
    let fx = TestFixture::new().await;
    let boss = fx.register("boss", &fx.company_b).await;
    fx.promote(&boss).await;

    fx.auth
        .reset_password(&fx.root, boss.user_id, "fresh-pass")
        .await
        .unwrap();
    assert!(fx.login("boss", "fresh-pass", &fx.company_b).await.is_ok());
}

#[tokio::test]
async fn test_reset_unknown_user_is_not_found() {
    let fx = TestFixture::new().await;
    let result = fx
        .auth
        .reset_password(&fx.root, Uuid::now_v7(), "fresh-pass")
        .await;
    assert!(matches!(result, Err(AuthError::NotFound(_))));
}

// ============================================================================
// Organizations
// ============================================================================

#[tokio::test]
async fn test_delete_org_with_members_conflicts() {
    let fx = TestFixture::new().await;
    fx.register("alice", &fx.company_a).await;

    let result = fx.orgs.delete(&fx.root, fx.company_a.id).await;
    assert!(matches!(result, Err(AuthError::Conflict(_))));

    fx.orgs.delete(&fx.root, fx.company_b.id).await.unwrap();
    assert!(matches!(
        fx.orgs.get(&fx.root, fx.company_b.id).await,
        Err(AuthError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_reports_member_counts() {
    let fx = TestFixture::new().await;
    fx.register("alice", &fx.company_a).await;
    fx.register("bob", &fx.company_a).await;

    let summaries = fx.orgs.list(&fx.root).await.unwrap();
    let count_of = |code: &str| {
        summaries
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.member_count)
    };

    assert_eq!(count_of("system"), Some(1));
    assert_eq!(count_of("company_a"), Some(2));
    assert_eq!(count_of("company_b"), Some(0));
}

#[tokio::test]
async fn test_update_rejects_taken_code() {
    let fx = TestFixture::new().await;
    let result = fx
        .orgs
        .update(
            &fx.root,
            fx.company_b.id,
            OrganizationInput::new("company_a", "Company B"),
        )
        .await;
    assert!(matches!(result, Err(AuthError::Conflict(_))));
}

// ============================================================================
// Tokens
// ============================================================================

#[tokio::test]
async fn test_current_user_through_bearer() {
    let fx = TestFixture::new().await;
    let login = fx.register("alice", &fx.company_a).await;

    let caller = fx.identity(&login);
    let me = fx.auth.current_user(&caller).await.unwrap();
    assert_eq!(me.profile.id, login.user_id);
    assert_eq!(me.profile.email, "alice@example.com");
    assert_eq!(me.organization_code, "company_a");
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let fx = TestFixture::new().await;
    let login = fx.register("alice", &fx.company_a).await;

    let parts: Vec<&str> = login.token.split('.').collect();
    assert_eq!(parts.len(), 3);

    let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
    let mut claims: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    claims["role"] = serde_json::Value::String("super_admin".to_string());
    let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    let forged = format!("Bearer {}.{}.{}", parts[0], forged_payload, parts[2]);

    let result = fx.auth.authenticate(Some(&forged));
    assert!(matches!(result, Err(AuthError::InvalidToken(_))));
}

#[tokio::test]
async fn test_token_from_other_deployment_rejected() {
    let fx = TestFixture::new().await;
    let other = AuthService::new(
        Arc::new(MemoryIdentityStore::new()),
        AuthConfig {
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..AuthConfig::with_secret("a-different-secret")
        },
    )
    .unwrap();
    let foreign = other
        .tokens()
        .issue(Uuid::now_v7(), "admin", UserRole::SuperAdmin, Uuid::now_v7())
        .unwrap();

    let result = fx
        .auth
        .authenticate(Some(&format!("Bearer {}", foreign.token)));
    assert!(matches!(result, Err(AuthError::InvalidToken(_))));
}
