//! Credential hashing
//!
//! Passwords are stored as Argon2id digests in PHC string format. The digest
//! embeds its own salt and cost parameters, so verification keeps working
//! after the configured cost changes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Salted, slow, one-way password hashing.
///
/// Hashing is CPU-bound. Async callers should use [`CredentialHasher::hash_async`]
/// and [`CredentialHasher::verify_async`], which move the work off the runtime
/// threads.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Create a hasher with the cost parameters from `config`.
    ///
    /// # Returns
    ///
    /// Hasher or configuration error if the parameters are out of range
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::ConfigError(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Two calls with the same input yield different digests.
    pub fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A malformed digest never verifies.
    pub fn verify(&self, digest: &str, plaintext: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password digest is malformed");
                return false;
            }
        };

        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Password verification failed");
                false
            }
        }
    }

    /// [`CredentialHasher::hash`] on the blocking thread pool.
    pub async fn hash_async(&self, plaintext: &str) -> AuthResult<String> {
        let hasher = self.clone();
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
    }

    /// [`CredentialHasher::verify`] on the blocking thread pool.
    pub async fn verify_async(&self, digest: &str, plaintext: &str) -> bool {
        let hasher = self.clone();
        let digest = digest.to_owned();
        let plaintext = plaintext.to_owned();
        match tokio::task::spawn_blocking(move || hasher.verify(&digest, &plaintext)).await {
            Ok(verified) => verified,
            Err(e) => {
                tracing::error!(error = %e, "Verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        let config = AuthConfig {
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..AuthConfig::with_secret("test-secret")
        };
        CredentialHasher::new(&config).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let digest = hasher.hash("secret1").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify(&digest, "secret1"));
        assert!(!hasher.verify(&digest, "secret2"));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = hasher();
        let a = hasher.hash("secret1").unwrap();
        let b = hasher.hash("secret1").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify(&a, "secret1"));
        assert!(hasher.verify(&b, "secret1"));
    }

    #[test]
    fn test_malformed_digest_never_verifies() {
        let hasher = hasher();
        assert!(!hasher.verify("", "secret1"));
        assert!(!hasher.verify("not-a-digest", "secret1"));
        assert!(!hasher.verify("$argon2id$v=19$garbage", "secret1"));
    }

    #[test]
    fn test_digest_from_other_params_still_verifies() {
        let digest = hasher().hash("secret1").unwrap();
        let stronger = CredentialHasher::new(&AuthConfig {
            argon2_memory_kib: 2048,
            argon2_iterations: 2,
            argon2_parallelism: 1,
            ..AuthConfig::with_secret("test-secret")
        })
        .unwrap();

        assert!(stronger.verify(&digest, "secret1"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = AuthConfig {
            argon2_memory_kib: 1,
            ..AuthConfig::with_secret("test-secret")
        };
        assert!(matches!(
            CredentialHasher::new(&config),
            Err(AuthError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hasher = hasher();
        let digest = hasher.hash_async("secret1").await.unwrap();

        assert!(hasher.verify_async(&digest, "secret1").await);
        assert!(!hasher.verify_async(&digest, "wrong").await);
    }
}
