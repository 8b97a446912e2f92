//! Access token claims
//!
//! The claim set carried by every access token. It is enough to
//! reconstruct the caller's [`Identity`] without a store lookup.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tenantgate_org::{Identity, UserRole};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Claims of a tenantgate access token.
///
/// # Example
///
/// ```rust
/// use tenantgate_auth::claims::Claims;
/// use tenantgate_org::UserRole;
/// use uuid::Uuid;
///
/// # fn main() -> tenantgate_auth::AuthResult<()> {
/// let claims = Claims::new(
///     Uuid::now_v7(),
///     "alice",
///     UserRole::OrgMember,
///     Uuid::now_v7(),
///     "tenantgate",
///     chrono::Duration::hours(24),
/// )?;
/// assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,

    /// Username at issue time
    pub username: String,

    /// Role at issue time
    pub role: UserRole,

    /// Organization the user belongs to
    pub org_id: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID
    pub jti: String,
}

impl Claims {
    /// Create claims valid from now for `ttl`.
    ///
    /// Fails with [`AuthError::Internal`] if the expiry is not a
    /// representable timestamp.
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        role: UserRole,
        organization_id: Uuid,
        issuer: impl Into<String>,
        ttl: Duration,
    ) -> AuthResult<Self> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Internal(format!("Token TTL out of range: {}", ttl)))?;

        Ok(Self {
            sub: user_id,
            username: username.into(),
            role,
            org_id: organization_id,
            iss: issuer.into(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires.timestamp(),
            jti: Uuid::now_v7().to_string(),
        })
    }

    /// Identity of the token bearer.
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, self.username.clone(), self.role, self.org_id)
    }

    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Claims {
        Claims::new(
            Uuid::now_v7(),
            "alice",
            UserRole::OrgAdmin,
            Uuid::now_v7(),
            "tenantgate",
            Duration::hours(24),
        )
        .unwrap()
    }

    #[test]
    fn test_claims_window() {
        let claims = sample();
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert!(claims.exp > Utc::now().timestamp());
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_identity_from_claims() {
        let claims = sample();
        let identity = claims.identity();

        assert_eq!(identity.user_id, claims.sub);
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, UserRole::OrgAdmin);
        assert_eq!(identity.organization_id, claims.org_id);
    }

    #[test]
    fn test_unrepresentable_ttl_is_error() {
        let result = Claims::new(
            Uuid::now_v7(),
            "alice",
            UserRole::OrgMember,
            Uuid::now_v7(),
            "tenantgate",
            Duration::seconds(10_000_000_000_000),
        );
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_unique_jti() {
        assert_ne!(sample().jti, sample().jti);
    }
}
