//! # Password Hashing
//!
//! Argon2 helpers for the account flows. Hashes are stored in PHC string
//! format (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), which embeds the
//! algorithm parameters so they can be tightened later without a migration.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::{ServiceError, ServiceResult};

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// An unparseable stored hash verifies as false rather than erroring; a
/// corrupt hash should read as "wrong password", not take the flow down.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("s3cret-phrase").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-phrase", &hash));
        assert!(!verify_password("wrong-phrase", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same-input").unwrap();
        let b = hash_password("same-input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
