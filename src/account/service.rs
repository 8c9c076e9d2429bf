/// Account lifecycle orchestration
///
/// Composes the user store, credential hasher, token issuer, OTP
/// generator, and mailer into the registration, session, and
/// password-recovery flows.
use crate::{
    account::{EmailVerification, TokenPair, UpdateProfileRequest},
    account::store::UserStore,
    auth::{otp, password, TokenIssuer, TokenKind},
    db::user::{User, UserPatch, UserStatus},
    error::{ApiError, ApiResult},
    mailer::Mailer,
};
use chrono::{Duration, Utc};
use std::sync::Arc;

pub struct AccountService {
    store: UserStore,
    tokens: Arc<TokenIssuer>,
    mailer: Arc<Mailer>,
    frontend_url: String,
}

impl AccountService {
    pub fn new(
        store: UserStore,
        tokens: Arc<TokenIssuer>,
        mailer: Arc<Mailer>,
        frontend_url: String,
    ) -> Self {
        Self {
            store,
            tokens,
            mailer,
            frontend_url,
        }
    }

    /// Register a new account
    ///
    /// The account persists even when the verification email cannot be
    /// dispatched; that failure is logged, not surfaced.
    pub async fn register(&self, name: &str, email: &str, plaintext: &str) -> ApiResult<User> {
        if self.store.email_exists(email).await? {
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = password::hash(plaintext)?;
        let user = self.store.create(name, email, &password_hash).await?;

        let verify_url = format!("{}/verify-email?code={}", self.frontend_url, user.id);
        if let Err(e) = self
            .mailer
            .send_verification_email(&user.email, &user.name, &verify_url)
            .await
        {
            tracing::warn!("Failed to send verification email to {}: {}", user.email, e);
        }

        Ok(user)
    }

    /// Verify an email address; idempotent once verified
    pub async fn verify_email(&self, code: &str) -> ApiResult<EmailVerification> {
        let user = self.store.find_by_id(code).await?.ok_or_else(|| {
            ApiError::Validation("Invalid or expired verification code.".to_string())
        })?;

        if user.verify_email {
            return Ok(EmailVerification::AlreadyVerified);
        }

        self.store.mark_email_verified(&user.id).await?;

        Ok(EmailVerification::Verified)
    }

    /// Authenticate and issue a fresh token pair
    ///
    /// The refresh token replaces whatever session was stored before;
    /// the last login wins.
    pub async fn login(&self, email: &str, plaintext: &str) -> ApiResult<TokenPair> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Validation("User not registered!".to_string()))?;

        if user.status != UserStatus::Active {
            return Err(ApiError::Validation(
                "Account is inactive or suspended. Please contact Admin.".to_string(),
            ));
        }

        if !password::verify(plaintext, &user.password_hash)? {
            return Err(ApiError::Validation(
                "Invalid password. Please try again.".to_string(),
            ));
        }

        let access_token = self.tokens.issue(&user.id, TokenKind::Access)?;
        let refresh_token = self.tokens.issue(&user.id, TokenKind::Refresh)?;

        self.store.set_refresh_token(&user.id, &refresh_token).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Invalidate the stored session credential
    pub async fn logout(&self, user_id: &str) -> ApiResult<()> {
        let found = self.store.clear_refresh_token(user_id).await?;
        if !found {
            return Err(ApiError::NotFound("User not found.".to_string()));
        }

        Ok(())
    }

    /// Apply a partial profile update; a supplied password is re-hashed
    pub async fn update_profile(
        &self,
        user_id: &str,
        req: UpdateProfileRequest,
    ) -> ApiResult<User> {
        let password_hash = match req.password.filter(|p| !p.is_empty()) {
            Some(plaintext) => Some(password::hash(&plaintext)?),
            None => None,
        };

        let patch = UserPatch {
            name: req.name.filter(|s| !s.is_empty()),
            email: req.email.filter(|s| !s.is_empty()),
            mobile: req.mobile.filter(|s| !s.is_empty()),
            password_hash,
        };

        self.store
            .update_profile(user_id, &patch)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Point the profile at an uploaded avatar image
    pub async fn set_avatar(&self, user_id: &str, avatar_url: &str) -> ApiResult<()> {
        let found = self.store.set_avatar(user_id, avatar_url).await?;
        if !found {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    /// Start a password reset: persist a fresh OTP valid for one hour,
    /// then dispatch it by email
    ///
    /// A dispatch failure is surfaced as a dependency error; the OTP
    /// stays persisted and is simply overwritten by the next request.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<()> {
        let user = self.store.find_by_email(email).await?.ok_or_else(|| {
            ApiError::NotFound("User with this email does not exist".to_string())
        })?;

        let code = otp::generate();
        let expiry = Utc::now() + Duration::hours(1);

        self.store
            .set_password_reset_otp(&user.id, &code, expiry)
            .await?;

        self.mailer
            .send_password_reset_email(&user.email, &user.name, &code)
            .await
            .map_err(|e| {
                tracing::error!("Failed to send OTP email to {}: {}", user.email, e);
                ApiError::Dependency("Failed to send OTP email".to_string())
            })?;

        Ok(())
    }

    /// Check a submitted OTP against the pending reset
    ///
    /// Advisory only: success records nothing, and the reset step does
    /// not require this call to have happened.
    pub async fn verify_otp(&self, email: &str, submitted: &str) -> ApiResult<()> {
        let user = self.store.find_by_email(email).await?.ok_or_else(|| {
            ApiError::NotFound("User with this email does not exist".to_string())
        })?;

        if let Some(expiry) = user.forgot_password_expiry {
            if expiry < Utc::now() {
                return Err(ApiError::OtpExpired);
            }
        }

        match user.forgot_password_otp.as_deref() {
            Some(stored) if stored == submitted => Ok(()),
            _ => Err(ApiError::Validation("Invalid OTP".to_string())),
        }
    }

    /// Replace the password and clear the pending reset
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ApiResult<()> {
        let user = self.store.find_by_email(email).await?.ok_or_else(|| {
            ApiError::NotFound("User with this email does not exist".to_string())
        })?;

        if new_password != confirm_password {
            return Err(ApiError::Validation(
                "New password and confirm password must be same".to_string(),
            ));
        }

        let password_hash = password::hash(new_password)?;
        self.store.reset_password(&user.id, &password_hash).await?;

        Ok(())
    }
}
