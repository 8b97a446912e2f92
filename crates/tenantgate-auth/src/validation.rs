//! Input validation
//!
//! Request fields are checked here before any store access. Lengths are
//! counted in characters.

use regex::Regex;
use tenantgate_org::organization::{MAX_CODE_LEN, MAX_DESCRIPTION_LEN};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Length bounds for usernames and passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPolicy {
    username_min: usize,
    username_max: usize,
    password_min: usize,
    password_max: usize,
}

impl CredentialPolicy {
    /// Bounds taken from `config`.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            username_min: config.username_min_len,
            username_max: config.username_max_len,
            password_min: config.password_min_len,
            password_max: config.password_max_len,
        }
    }

    /// Check a username for a new account.
    pub fn check_username(&self, username: &str) -> AuthResult<()> {
        check_length("username", username, self.username_min, self.username_max)?;
        if username.chars().any(char::is_whitespace) {
            return Err(AuthError::Validation(
                "username must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// Check a new password.
    pub fn check_password(&self, password: &str) -> AuthResult<()> {
        check_length("password", password, self.password_min, self.password_max)
    }
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

/// Reject an empty field.
pub fn require(field: &str, value: &str) -> AuthResult<()> {
    if value.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Check that `email` looks like an email address.
pub fn check_email(email: &str) -> AuthResult<()> {
    require("email", email)?;
    if !is_valid_email(email) {
        return Err(AuthError::Validation("email is invalid".to_string()));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Check an organization code.
pub fn check_org_code(code: &str) -> AuthResult<()> {
    check_length("code", code, 1, MAX_CODE_LEN)?;
    if code.chars().any(char::is_whitespace) {
        return Err(AuthError::Validation(
            "code must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Check an organization description. Empty is allowed.
pub fn check_description(description: &str) -> AuthResult<()> {
    check_length("description", description, 0, MAX_DESCRIPTION_LEN)
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> AuthResult<()> {
    let len = value.chars().count();
    if len == 0 && min > 0 {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }
    if len < min || len > max {
        return Err(AuthError::Validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}
