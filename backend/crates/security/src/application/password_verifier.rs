//! Password Verification
//!
//! Hash comparison is CPU-bound and runs on the blocking thread pool.

use platform::password::{ClearTextPassword, StoredPasswordHash};

use crate::error::{SecurityError, SecurityResult};

/// Compare a clear-text password against a stored hash
///
/// A malformed hash yields `Ok(false)`; only a failed blocking task is an error.
pub async fn verify_password(
    hash: StoredPasswordHash,
    password: ClearTextPassword,
) -> SecurityResult<bool> {
    tokio::task::spawn_blocking(move || hash.verify(&password))
        .await
        .map_err(|e| SecurityError::Internal(format!("Password verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::HashScheme;

    #[tokio::test]
    async fn test_verify_password() {
        let hash = ClearTextPassword::new("hunter22".to_string())
            .hash(HashScheme::Bcrypt { cost: 4 })
            .unwrap();

        let ok = verify_password(hash.clone(), ClearTextPassword::new("hunter22".to_string()))
            .await
            .unwrap();
        assert!(ok);

        let bad = verify_password(hash, ClearTextPassword::new("hunter23".to_string()))
            .await
            .unwrap();
        assert!(!bad);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_mismatch() {
        let ok = verify_password(
            StoredPasswordHash::from_stored("garbage"),
            ClearTextPassword::new("anything".to_string()),
        )
        .await
        .unwrap();
        assert!(!ok);
    }
}
