/// User database model and partial-update patch
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account standing; login is permitted only when Active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

/// User record in the database
///
/// Wire names follow the public API contract: the id serializes as `_id`
/// and the stored hash as `password` (the registration and update
/// responses include it).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub avatar: String,
    pub mobile: Option<String>,
    pub refresh_token: String,
    pub verify_email: bool,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forgot_password_otp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forgot_password_expiry: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; only present fields are written
#[derive(Debug, Default, Clone)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            avatar: String::new(),
            mobile: None,
            refresh_token: String::new(),
            verify_email: false,
            status: UserStatus::Active,
            forgot_password_otp: None,
            forgot_password_expiry: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn user_serializes_with_wire_names() {
        let value = serde_json::to_value(sample_user()).unwrap();

        assert!(value.get("_id").is_some());
        assert!(value.get("password").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        // Cleared recovery fields are omitted entirely
        assert!(value.get("forgot_password_otp").is_none());
        assert!(value.get("forgot_password_expiry").is_none());
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(UserPatch::default().is_empty());

        let patch = UserPatch {
            mobile: Some("555-0100".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
