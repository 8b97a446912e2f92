//! Organization domain models
//!
//! Organizations are the tenants of the system. They scope username
//! uniqueness and member visibility but never own a user's lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Code of the reserved organization that holds every super-admin account.
pub const SYSTEM_ORG_CODE: &str = "system";

/// Description given to the system organization at bootstrap.
pub const SYSTEM_ORG_DESCRIPTION: &str = "System Organization";

/// Maximum length of an organization code.
pub const MAX_CODE_LEN: usize = 32;

/// Maximum length of an organization description.
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// An organization represents a tenant.
///
/// # Examples
///
/// ```
/// use tenantgate_org::Organization;
///
/// let org = Organization::new("company_a", "A sample organization");
/// assert_eq!(org.code, "company_a");
/// assert!(org.is_active());
/// assert!(!org.is_system());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Tenant code chosen by the operator (unique across the platform)
    pub code: String,

    /// Free text description
    #[serde(default)]
    pub description: String,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-deletion marker
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Organization {
    /// Creates a new, active organization with a fresh UUID v7 ID.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            code: code.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Creates the reserved system organization.
    pub fn system() -> Self {
        Self::new(SYSTEM_ORG_CODE, SYSTEM_ORG_DESCRIPTION)
    }

    /// Whether this is the reserved system organization.
    pub fn is_system(&self) -> bool {
        self.code == SYSTEM_ORG_CODE
    }

    /// Whether the organization has not been soft-deleted.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Replace code and description, bumping `updated_at`.
    pub fn rename(&mut self, code: impl Into<String>, description: impl Into<String>) {
        self.code = code.into();
        self.description = description.into();
        self.updated_at = Utc::now();
    }

    /// Mark the organization as deleted.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// Summary of an organization for list displays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationSummary {
    /// Organization ID
    pub id: Uuid,

    /// Tenant code
    pub code: String,

    /// Description
    pub description: String,

    /// Number of active users referencing the organization
    pub member_count: u64,

    /// When the organization was created
    pub created_at: DateTime<Utc>,
}

impl OrganizationSummary {
    /// Build a summary from an organization and its member count.
    pub fn new(org: &Organization, member_count: u64) -> Self {
        Self {
            id: org.id,
            code: org.code.clone(),
            description: org.description.clone(),
            member_count,
            created_at: org.created_at,
        }
    }
}
