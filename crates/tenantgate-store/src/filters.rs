//! Query filters for counting users and organizations
//!
//! Filters describe a query independently of the backend. The in-memory
//! store evaluates them with [`UserFilter::matches`] and
//! [`OrgFilter::matches`]; SQL backends translate them into `WHERE` clauses.

use tenantgate_org::{Organization, User, UserRole};
use uuid::Uuid;

/// Filter over active users.
///
/// `username` and `email` combine with OR when both are set, so a single
/// filter expresses "username or email already taken". Every other field
/// combines with AND.
///
/// # Example
///
/// ```
/// use uuid::Uuid;
/// use tenantgate_store::UserFilter;
///
/// let org_id = Uuid::now_v7();
/// let filter = UserFilter::new()
///     .username("alice")
///     .email("alice@example.com")
///     .organization(org_id);
/// assert_eq!(filter.organization_id, Some(org_id));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Match on username
    pub username: Option<String>,
    /// Match on email
    pub email: Option<String>,
    /// Restrict to one organization
    pub organization_id: Option<Uuid>,
    /// Restrict to one role
    pub role: Option<UserRole>,
}

impl UserFilter {
    /// Empty filter matching every active user.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match on username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Match on email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Restrict to one organization.
    pub fn organization(mut self, organization_id: Uuid) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Restrict to one role.
    pub fn role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Evaluate the filter against a user. Soft-deleted users never match.
    pub fn matches(&self, user: &User) -> bool {
        if !user.is_active() {
            return false;
        }

        let identity_match = match (&self.username, &self.email) {
            (None, None) => true,
            (Some(username), None) => user.username == *username,
            (None, Some(email)) => user.email == *email,
            (Some(username), Some(email)) => user.username == *username || user.email == *email,
        };

        identity_match
            && self
                .organization_id
                .map_or(true, |org_id| user.organization_id == org_id)
            && self.role.map_or(true, |role| user.role == role)
    }
}

/// Filter over active organizations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgFilter {
    /// Match on code
    pub code: Option<String>,
    /// Exclude one organization (used when renaming)
    pub exclude_id: Option<Uuid>,
}

impl OrgFilter {
    /// Empty filter matching every active organization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match on code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Exclude one organization.
    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    /// Evaluate the filter against an organization. Soft-deleted organizations never match.
    pub fn matches(&self, org: &Organization) -> bool {
        org.is_active()
            && self.code.as_ref().map_or(true, |code| org.code == *code)
            && self.exclude_id.map_or(true, |id| org.id != id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str, org: Uuid) -> User {
        User::new(username, "digest", email, UserRole::OrgMember, org)
    }

    #[test]
    fn test_username_or_email_semantics() {
        let org = Uuid::now_v7();
        let filter = UserFilter::new()
            .username("alice")
            .email("alice@example.com")
            .organization(org);

        assert!(filter.matches(&user("alice", "other@example.com", org)));
        assert!(filter.matches(&user("bob", "alice@example.com", org)));
        assert!(!filter.matches(&user("bob", "bob@example.com", org)));
        assert!(!filter.matches(&user("alice", "alice@example.com", Uuid::now_v7())));
    }

    #[test]
    fn test_deleted_users_never_match() {
        let mut deleted = user("alice", "a@example.com", Uuid::now_v7());
        deleted.soft_delete();
        assert!(!UserFilter::new().matches(&deleted));
    }

    #[test]
    fn test_role_filter() {
        let org = Uuid::now_v7();
        let filter = UserFilter::new().role(UserRole::SuperAdmin);
        assert!(!filter.matches(&user("alice", "a@example.com", org)));
    }

    #[test]
    fn test_org_filter_exclusion() {
        let org = Organization::new("acme", "");
        assert!(OrgFilter::new().code("acme").matches(&org));
        assert!(!OrgFilter::new().code("acme").excluding(org.id).matches(&org));
        assert!(!OrgFilter::new().code("other").matches(&org));
    }
}
