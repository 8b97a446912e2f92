//! # Actions
//!
//! Operations that can be performed on resources.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on resources.
///
/// - **Read**: View a single resource
/// - **List**: Browse resources
/// - **Create**: Create new resource instances
/// - **Update**: Modify existing resources
/// - **Delete**: Remove resources
/// - **ChangePassword**: Replace one's own password with proof of the old one
/// - **ResetPassword**: Replace another account's password without proof
/// - **Manage**: Everything above
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/view resource.
    Read,

    /// List/query resources.
    List,

    /// Create new resource.
    Create,

    /// Update existing resource.
    Update,

    /// Delete resource.
    Delete,

    /// Change one's own password.
    ChangePassword,

    /// Reset another account's password.
    ResetPassword,

    /// Full administration of the resource type.
    Manage,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::List => "list",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::ChangePassword => "change_password",
            Action::ResetPassword => "reset_password",
            Action::Manage => "manage",
        }
    }

    /// Check if this action implies another action.
    ///
    /// - `Manage` implies all other actions
    /// - `Update`, `Delete` and `Create` imply `Read`
    pub fn implies(&self, other: Action) -> bool {
        match self {
            Action::Manage => true,
            Action::Update | Action::Delete | Action::Create => other == Action::Read,
            _ => false,
        }
    }
}
