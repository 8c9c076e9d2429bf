/// Password hashing with bcrypt
///
/// Each call generates a fresh salt which is embedded in the digest.
use crate::error::{ApiError, ApiResult};

/// Fixed work factor for all stored hashes
const COST: u32 = 10;

/// Hash a plaintext password
pub fn hash(plaintext: &str) -> ApiResult<String> {
    bcrypt::hash(plaintext, COST)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a plaintext password against a stored digest
pub fn verify(plaintext: &str, digest: &str) -> ApiResult<bool> {
    bcrypt::verify(plaintext, digest)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let digest = hash("hunter2!").unwrap();

        assert!(verify("hunter2!", &digest).unwrap());
        assert!(!verify("hunter3!", &digest).unwrap());
    }

    #[test]
    fn same_password_hashes_to_distinct_digests() {
        let a = hash("correct horse battery staple").unwrap();
        let b = hash("correct horse battery staple").unwrap();

        // Per-call salts make digests unique
        assert_ne!(a, b);
    }

    #[test]
    fn digest_never_contains_plaintext() {
        let digest = hash("supersecret").unwrap();
        assert!(!digest.contains("supersecret"));
    }
}
