//! User domain models
//!
//! A user belongs to exactly one organization and carries one role. The
//! stored password is always an opaque digest produced by the credential
//! hasher; it is never serialized outward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::UserRole;

/// A user account.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use tenantgate_org::{User, UserRole};
///
/// let org_id = Uuid::now_v7();
/// let user = User::new("john_doe", "$argon2id$...", "john@example.com", UserRole::OrgMember, org_id);
/// assert_eq!(user.organization_id, org_id);
/// assert!(user.is_active());
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Login name, unique within the organization
    pub username: String,

    #[serde(skip_serializing, default)]
    password_hash: String,

    /// Contact email, unique within the organization
    pub email: String,

    /// Role of the account
    pub role: UserRole,

    /// Owning organization. Super-admins point at the system organization.
    pub organization_id: Uuid,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-deletion marker
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("organization_id", &self.organization_id)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}

impl User {
    /// Creates a new active user.
    ///
    /// # Arguments
    ///
    /// * `username` - Login name
    /// * `password_hash` - Digest produced by the credential hasher
    /// * `email` - Contact email
    /// * `role` - Account role
    /// * `organization_id` - Owning organization
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        organization_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            role,
            organization_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// The stored password digest.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Replace the stored password digest.
    ///
    /// Only the password lifecycle operations call this, always with a
    /// freshly hashed value.
    pub fn replace_password_hash(&mut self, digest: impl Into<String>) {
        self.password_hash = digest.into();
        self.updated_at = Utc::now();
    }

    /// Whether the user has not been soft-deleted.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Mark the user as deleted.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    /// Public view of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Outward view of a user, safe to hand to the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Contact email
    pub email: String,

    /// Account role
    pub role: UserRole,

    /// Owning organization
    pub organization_id: Uuid,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            organization_id: user.organization_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "alice",
            "$argon2id$v=19$digest",
            "alice@example.com",
            UserRole::OrgMember,
            Uuid::now_v7(),
        )
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "org_member");
    }

    #[test]
    fn test_debug_redacts_hash() {
        let rendered = format!("{:?}", sample_user());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("argon2id"));
    }

    #[test]
    fn test_replace_password_hash() {
        let mut user = sample_user();
        user.replace_password_hash("new-digest");
        assert_eq!(user.password_hash(), "new-digest");
    }

    #[test]
    fn test_profile_copies_identity_fields() {
        let user = sample_user();
        let profile = user.profile();

        assert_eq!(profile.id, user.id);
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.organization_id, user.organization_id);
    }

    #[test]
    fn test_soft_delete() {
        let mut user = sample_user();
        user.soft_delete();
        assert!(!user.is_active());
    }
}
