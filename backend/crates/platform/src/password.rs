//! Password Hashing and Verification
//!
//! Stored hashes come from the credential store and may be either:
//! - bcrypt (`$2a$`, `$2b$`, `$2x$`, `$2y$` modular crypt strings)
//! - Argon2id / Argon2i / Argon2d PHC strings (`$argon2id$...`)
//!
//! ## Security Features
//! - Zeroization of clear-text passwords on drop
//! - Constant-time comparison (delegated to the `bcrypt` and `argon2` crates)
//! - Redacted `Debug` output for both clear text and hashes

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

// ============================================================================
// Hash schemes
// ============================================================================

/// Supported hashing schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// bcrypt with the given cost factor (4..=31)
    Bcrypt { cost: u32 },
    /// Argon2id with the crate's default (OWASP) parameters
    Argon2id,
}

impl HashScheme {
    /// Detect the scheme of a stored hash from its prefix
    pub fn detect(stored: &str) -> Option<Self> {
        if stored.starts_with("$argon2") {
            return Some(HashScheme::Argon2id);
        }

        const BCRYPT_PREFIXES: &[&str] = &["$2a$", "$2b$", "$2x$", "$2y$"];
        if BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p)) {
            let cost = stored
                .get(4..6)
                .and_then(|c| c.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST);
            return Some(HashScheme::Bcrypt { cost });
        }

        None
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password with the given scheme
    ///
    /// Used to provision accounts and test fixtures; login only verifies.
    pub fn hash(&self, scheme: HashScheme) -> Result<StoredPasswordHash, PasswordHashError> {
        let hash = match scheme {
            HashScheme::Bcrypt { cost } => bcrypt::hash(self.as_bytes(), cost)
                .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?,
            HashScheme::Argon2id => {
                let salt = SaltString::generate(OsRng);
                Argon2::default()
                    .hash_password(self.as_bytes(), &salt)
                    .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
                    .to_string()
            }
        };

        Ok(StoredPasswordHash { hash })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Stored Password Hash
// ============================================================================

/// Password hash as held by the credential store
#[derive(Clone, PartialEq, Eq)]
pub struct StoredPasswordHash {
    hash: String,
}

impl StoredPasswordHash {
    /// Wrap a hash read from the store. The format is checked at verification time.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn scheme(&self) -> Option<HashScheme> {
        HashScheme::detect(&self.hash)
    }

    /// Verify a password against this hash
    ///
    /// An unrecognised or malformed hash never verifies; it is logged and
    /// treated like a wrong password.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        match self.scheme() {
            Some(HashScheme::Bcrypt { .. }) => {
                match bcrypt::verify(password.as_bytes(), &self.hash) {
                    Ok(valid) => valid,
                    Err(e) => {
                        tracing::warn!(error = %e, "Malformed bcrypt hash in credential store");
                        false
                    }
                }
            }
            Some(HashScheme::Argon2id) => {
                let parsed_hash = match PasswordHash::new(&self.hash) {
                    Ok(h) => h,
                    Err(e) => {
                        tracing::warn!(error = %e, "Malformed Argon2 hash in credential store");
                        return false;
                    }
                };

                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok()
            }
            None => {
                tracing::warn!("Unsupported password hash format in credential store");
                false
            }
        }
    }
}

impl fmt::Debug for StoredPasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredPasswordHash")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FAST_BCRYPT: HashScheme = HashScheme::Bcrypt { cost: 4 };

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let password = ClearTextPassword::new("correct horse".to_string());
        let hashed = password.hash(FAST_BCRYPT).unwrap();

        assert!(hashed.verify(&password));

        let wrong = ClearTextPassword::new("wrong".to_string());
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let password = ClearTextPassword::new("TestPassword123!".to_string());
        let hashed = password.hash(HashScheme::Argon2id).unwrap();
        assert_eq!(hashed.scheme(), Some(HashScheme::Argon2id));

        assert!(hashed.verify(&password));
        assert!(!hashed.verify(&ClearTextPassword::new("nope".to_string())));
    }

    #[test]
    fn test_stored_roundtrip() {
        let password = ClearTextPassword::new("s3cret".to_string());
        let hashed = password.hash(FAST_BCRYPT).unwrap();

        let restored = StoredPasswordHash::from_stored(hashed.as_str().to_string());
        assert!(restored.verify(&password));
    }

    #[test]
    fn test_detect_scheme() {
        assert_eq!(
            HashScheme::detect("$2b$10$abcdefghijklmnopqrstuu"),
            Some(HashScheme::Bcrypt { cost: 10 })
        );
        assert_eq!(
            HashScheme::detect("$2a$12$abcdefghijklmnopqrstuu"),
            Some(HashScheme::Bcrypt { cost: 12 })
        );
        assert_eq!(
            HashScheme::detect("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
            Some(HashScheme::Argon2id)
        );
        assert_eq!(HashScheme::detect("plaintext"), None);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = ClearTextPassword::new("anything".to_string());
        assert!(!StoredPasswordHash::from_stored("not_a_valid_hash").verify(&password));
        assert!(!StoredPasswordHash::from_stored("$2b$10$short").verify(&password));
        assert!(!StoredPasswordHash::from_stored("$argon2id$garbage").verify(&password));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(FAST_BCRYPT).unwrap();
        assert!(!format!("{:?}", hashed).contains("$2"));
    }
}
