//! Authentication configuration
//!
//! Configuration is an explicit value constructed at startup and handed to
//! the services. It is loaded from environment variables with defaults
//! suitable for local development; the signing secret has no default.

use chrono::{Duration, Utc};

use crate::error::{AuthError, AuthResult};

/// Password given to the bootstrap super-admin when none is configured.
pub const DEFAULT_BOOTSTRAP_PASSWORD: &str = "admin";

/// Longest accepted token lifetime, in days.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

/// Configuration for the authentication core.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret
    pub jwt_secret: String,

    /// Token issuer (`iss` claim)
    pub issuer: String,

    /// Token lifetime
    pub token_ttl: Duration,

    /// Username of the bootstrap super-admin
    pub bootstrap_username: String,

    /// Email of the bootstrap super-admin
    pub bootstrap_email: String,

    /// Password of the bootstrap super-admin; falls back to
    /// [`DEFAULT_BOOTSTRAP_PASSWORD`] when unset
    pub bootstrap_password: Option<String>,

    /// Minimum password length in characters
    pub password_min_len: usize,

    /// Maximum password length in characters
    pub password_max_len: usize,

    /// Minimum username length in characters
    pub username_min_len: usize,

    /// Maximum username length in characters
    pub username_max_len: usize,

    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count
    pub argon2_iterations: u32,

    /// Argon2 degree of parallelism
    pub argon2_parallelism: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("token_ttl", &self.token_ttl)
            .field("bootstrap_username", &self.bootstrap_username)
            .field("bootstrap_email", &self.bootstrap_email)
            .field(
                "bootstrap_password",
                &self.bootstrap_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("password_min_len", &self.password_min_len)
            .field("password_max_len", &self.password_max_len)
            .field("username_min_len", &self.username_min_len)
            .field("username_max_len", &self.username_max_len)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "tenantgate".to_string(),
            token_ttl: Duration::hours(24),
            bootstrap_username: "admin".to_string(),
            bootstrap_email: "admin@system.com".to_string(),
            bootstrap_password: None,
            password_min_len: 6,
            password_max_len: 32,
            username_min_len: 3,
            username_max_len: 32,
            argon2_memory_kib: argon2::Params::DEFAULT_M_COST,
            argon2_iterations: argon2::Params::DEFAULT_T_COST,
            argon2_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl AuthConfig {
    /// Create a configuration with the given signing secret and defaults otherwise.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TENANTGATE_JWT_SECRET`: signing secret (required, see [`AuthConfig::validate`])
    /// - `TENANTGATE_JWT_ISSUER`: token issuer (default: tenantgate)
    /// - `TENANTGATE_TOKEN_TTL_SECS`: token lifetime in seconds (default: 86400,
    ///   at most [`MAX_TOKEN_TTL_DAYS`] days)
    /// - `TENANTGATE_ADMIN_USERNAME`: bootstrap admin username (default: admin)
    /// - `TENANTGATE_ADMIN_EMAIL`: bootstrap admin email (default: admin@system.com)
    /// - `TENANTGATE_ADMIN_PASSWORD`: bootstrap admin password (default: admin)
    /// - `TENANTGATE_PASSWORD_MIN_LEN` / `TENANTGATE_PASSWORD_MAX_LEN` (default: 6 / 32)
    /// - `TENANTGATE_USERNAME_MIN_LEN` / `TENANTGATE_USERNAME_MAX_LEN` (default: 3 / 32)
    /// - `TENANTGATE_ARGON2_MEMORY_KIB`, `TENANTGATE_ARGON2_ITERATIONS`,
    ///   `TENANTGATE_ARGON2_PARALLELISM`: hashing cost
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            jwt_secret: std::env::var("TENANTGATE_JWT_SECRET").unwrap_or(default.jwt_secret),
            issuer: std::env::var("TENANTGATE_JWT_ISSUER").unwrap_or(default.issuer),
            token_ttl: env_parse::<i64>("TENANTGATE_TOKEN_TTL_SECS")
                .and_then(Duration::try_seconds)
                .unwrap_or(default.token_ttl),
            bootstrap_username: std::env::var("TENANTGATE_ADMIN_USERNAME")
                .unwrap_or(default.bootstrap_username),
            bootstrap_email: std::env::var("TENANTGATE_ADMIN_EMAIL")
                .unwrap_or(default.bootstrap_email),
            bootstrap_password: std::env::var("TENANTGATE_ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            password_min_len: env_parse("TENANTGATE_PASSWORD_MIN_LEN")
                .unwrap_or(default.password_min_len),
            password_max_len: env_parse("TENANTGATE_PASSWORD_MAX_LEN")
                .unwrap_or(default.password_max_len),
            username_min_len: env_parse("TENANTGATE_USERNAME_MIN_LEN")
                .unwrap_or(default.username_min_len),
            username_max_len: env_parse("TENANTGATE_USERNAME_MAX_LEN")
                .unwrap_or(default.username_max_len),
            argon2_memory_kib: env_parse("TENANTGATE_ARGON2_MEMORY_KIB")
                .unwrap_or(default.argon2_memory_kib),
            argon2_iterations: env_parse("TENANTGATE_ARGON2_ITERATIONS")
                .unwrap_or(default.argon2_iterations),
            argon2_parallelism: env_parse("TENANTGATE_ARGON2_PARALLELISM")
                .unwrap_or(default.argon2_parallelism),
        }
    }

    /// The bootstrap admin password, falling back to the default literal.
    pub fn bootstrap_password(&self) -> &str {
        self.bootstrap_password
            .as_deref()
            .unwrap_or(DEFAULT_BOOTSTRAP_PASSWORD)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> AuthResult<()> {
        if self.jwt_secret.is_empty() {
            return Err(AuthError::ConfigError(
                "TENANTGATE_JWT_SECRET must be set".to_string(),
            ));
        }
        if self.token_ttl <= Duration::zero() {
            return Err(AuthError::ConfigError(
                "token TTL must be positive".to_string(),
            ));
        }
        if self.token_ttl > Duration::days(MAX_TOKEN_TTL_DAYS)
            || Utc::now().checked_add_signed(self.token_ttl).is_none()
        {
            return Err(AuthError::ConfigError(format!(
                "token TTL must not exceed {} days",
                MAX_TOKEN_TTL_DAYS
            )));
        }
        if self.password_min_len == 0 || self.password_min_len > self.password_max_len {
            return Err(AuthError::ConfigError(format!(
                "invalid password length bounds {}..={}",
                self.password_min_len, self.password_max_len
            )));
        }
        if self.username_min_len == 0 || self.username_min_len > self.username_max_len {
            return Err(AuthError::ConfigError(format!(
                "invalid username length bounds {}..={}",
                self.username_min_len, self.username_max_len
            )));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
