//! Bearer token extraction
//!
//! Turns an `Authorization` header value into a verified [`Identity`].

use tenantgate_org::Identity;

use crate::error::{AuthError, AuthResult, TokenRejection};
use crate::jwt::TokenService;

const BEARER_SCHEME: &str = "Bearer";

/// Strip the `Bearer` scheme from a header value.
///
/// The scheme is matched case-insensitively and must be followed by
/// whitespace or nothing; a bare scheme yields an empty token. A value
/// without the scheme is taken to be the raw token.
pub fn extract_bearer(header: &str) -> &str {
    let header = header.trim_start();
    if let Some(scheme) = header.get(..BEARER_SCHEME.len()) {
        let rest = &header[BEARER_SCHEME.len()..];
        if scheme.eq_ignore_ascii_case(BEARER_SCHEME)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            return rest.trim();
        }
    }
    header.trim_end()
}

/// Verify the token in an `Authorization` header and return the caller's identity.
///
/// # Arguments
///
/// * `tokens` - Token service used for verification
/// * `header` - Raw header value, if the request carried one
///
/// # Returns
///
/// The identity encoded in the token, or [`AuthError::InvalidToken`]
pub fn authenticate(tokens: &TokenService, header: Option<&str>) -> AuthResult<Identity> {
    let token = header.map(extract_bearer).unwrap_or_default();
    if token.is_empty() {
        tracing::debug!("Request carried no bearer token");
        return Err(AuthError::InvalidToken(TokenRejection::Missing));
    }

    let claims = tokens.verify(token)?;
    Ok(claims.identity())
}
