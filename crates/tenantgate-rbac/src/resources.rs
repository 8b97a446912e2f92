//! # Resource Types
//!
//! Resources that privileged operations act upon.

use serde::{Deserialize, Serialize};

/// Resource types that can have permissions assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Tenant organizations.
    Organization,
    /// Regular user accounts (members and organization admins).
    User,
    /// Super-admin accounts.
    Admin,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Organization => "organization",
            ResourceType::User => "user",
            ResourceType::Admin => "admin",
        }
    }
}
