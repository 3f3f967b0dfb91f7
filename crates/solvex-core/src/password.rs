//! Credential hashing.
//!
//! Digests are bcrypt strings, salted per call, so hashing the same
//! password twice yields two different digests that both verify.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored digest.
///
/// A wrong password is `Ok(false)`. A digest that is not valid bcrypt is an
/// error; callers on the sign-in path treat both the same way.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let digest = hash_password("hunter2hunter2").unwrap();
        assert_ne!(digest, "hunter2hunter2");
        assert!(digest.starts_with("$2"));
    }

    #[test]
    fn test_round_trip() {
        let digest = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &digest).unwrap());
        assert!(!verify_password("wrong horse", &digest).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_error() {
        assert!(verify_password("anything", "not-a-digest").is_err());
    }
}
