//! Access token issue and verification
//!
//! Tokens are HS256-signed JWTs carrying [`Claims`]. Verification checks the
//! signature, `exp` and `nbf` with no leeway, and the issuer.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use tenantgate_org::UserRole;
use uuid::Uuid;

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult, TokenRejection};

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// Encoded JWT
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens.
#[derive(Clone)]
pub struct TokenService {
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    /// Create a token service from the signing secret, issuer and TTL in `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Authentication configuration
    ///
    /// # Returns
    ///
    /// Token service or configuration error if no secret is set
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::ConfigError(
                "Secret required for HMAC".to_string(),
            ));
        }

        Ok(Self {
            issuer: config.issuer.clone(),
            ttl: config.token_ttl,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        })
    }

    /// Issue a token for a user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's unique identifier
    /// * `username` - The user's username
    /// * `role` - The user's role
    /// * `organization_id` - The user's organization
    ///
    /// # Returns
    ///
    /// Encoded token and its expiry
    pub fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        role: UserRole,
        organization_id: Uuid,
    ) -> AuthResult<IssuedToken> {
        let claims = Claims::new(
            user_id,
            username,
            role,
            organization_id,
            self.issuer.as_str(),
            self.ttl,
        )?;
        let token = self.encode_claims(&claims)?;

        tracing::debug!(user_id = %user_id, role = %role, "Issued access token");

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Sign arbitrary claims.
    pub fn encode_claims(&self, claims: &Claims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Validate and decode a token.
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT token string
    ///
    /// # Returns
    ///
    /// Decoded claims if valid. Every failure is [`AuthError::InvalidToken`];
    /// the reason is logged, not returned to clients.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::ImmatureSignature => TokenRejection::Premature,
                    ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                    ErrorKind::InvalidIssuer => TokenRejection::WrongIssuer,
                    _ => TokenRejection::Malformed,
                };
                tracing::debug!(reason = %reason, error = %e, "Rejected access token");
                AuthError::InvalidToken(reason)
            })
    }
}
