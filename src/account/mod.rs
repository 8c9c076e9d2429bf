/// Account lifecycle system
///
/// Request/response types for registration, verification, sessions,
/// profile updates, and password recovery.

pub mod service;
pub mod store;

pub use service::AccountService;
pub use store::UserStore;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    pub name: Option<String>,
    #[validate(email(message = "Provide a valid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Email verification request; the code embeds the account id
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub code: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Issued session credentials, returned in the body and set as cookies
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Partial profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[validate(email(message = "Provide a valid email address"))]
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
}

/// Forgotten-password request
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// OTP submitted either as a JSON string or a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OtpInput {
    Text(String),
    Number(u64),
}

impl OtpInput {
    /// Normalize to the string form used for comparison
    pub fn into_string(self) -> String {
        match self {
            OtpInput::Text(s) => s,
            OtpInput::Number(n) => n.to_string(),
        }
    }
}

/// OTP verification request
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<OtpInput>,
}

/// Password reset request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Avatar upload response payload
#[derive(Debug, Serialize)]
pub struct AvatarData {
    #[serde(rename = "_id")]
    pub id: String,
    pub avatar: String,
}

/// Outcome of an email verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailVerification {
    Verified,
    AlreadyVerified,
}
