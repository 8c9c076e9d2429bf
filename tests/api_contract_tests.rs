/// Tests for API contract building blocks
///
/// Note: These are unit tests that verify the logic is correct.
/// Integration tests would require a running server.

#[cfg(test)]
mod tests {
    #[test]
    fn test_otp_generation_range() {
        use rand::Rng;

        for _ in 0..100 {
            let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
            let text = code.to_string();

            assert_eq!(text.len(), 6);
            assert!(!text.starts_with('0'));
        }
    }

    #[test]
    fn test_authorization_header_parsing() {
        let auth_header = "Bearer abc123token";
        let token = auth_header.strip_prefix("Bearer ");
        assert_eq!(token, Some("abc123token"));

        let invalid_header = "abc123token";
        let token = invalid_header.strip_prefix("Bearer ");
        assert_eq!(token, None);
    }

    #[test]
    fn test_content_id_shape() {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(b"image-bytes");
        let id = hex::encode(hasher.finalize());

        // 32 bytes of digest as lowercase hex
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }

    #[test]
    fn test_identical_content_hashes_identically() {
        use sha2::{Digest, Sha256};

        let digest = |data: &[u8]| {
            let mut hasher = Sha256::new();
            hasher.update(data);
            hex::encode(hasher.finalize())
        };

        assert_eq!(digest(b"same"), digest(b"same"));
        assert_ne!(digest(b"same"), digest(b"different"));
    }

    #[test]
    fn test_response_envelope_shape() {
        let success = serde_json::json!({
            "message": "Login successful!",
            "data": {"accessToken": "a", "refreshToken": "r"},
            "error": false,
            "success": true,
        });
        assert_eq!(success["error"], false);
        assert_eq!(success["success"], true);

        let failure = serde_json::json!({
            "message": "User not registered!",
            "error": true,
            "success": false,
        });
        assert_eq!(failure["error"], true);
        assert!(failure.get("data").is_none());
    }
}
