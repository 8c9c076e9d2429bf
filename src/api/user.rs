/// /api/user/* endpoints
use crate::{
    account::{
        AvatarData, EmailVerification, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest, TokenPair, UpdateProfileRequest, VerifyEmailRequest,
        VerifyOtpRequest,
    },
    api::Envelope,
    auth::{AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    context::AppContext,
    db::user::User,
    error::{ApiError, ApiResult},
    media::ImagePayload,
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/user/register", post(register))
        .route("/api/user/verify-email", post(verify_email))
        .route("/api/user/login", post(login))
        .route("/api/user/logout", post(logout))
        .route("/api/user/avatar", put(upload_avatar))
        .route("/api/user/update", put(update_user))
        .route("/api/user/forgot-password", post(forgot_password))
        .route("/api/user/verify-otp", post(verify_otp))
        .route("/api/user/reset-password", post(reset_password))
}

fn require(field: Option<String>, message: &str) -> ApiResult<String> {
    field
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}

/// Session cookies are httpOnly, secure, and sent cross-site
fn auth_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Register endpoint
async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<User>>)> {
    req.validate()
        .map_err(|_| ApiError::Validation("Provide a valid email address".to_string()))?;

    let missing = "Provide name, email and password";
    let name = require(req.name, missing)?;
    let email = require(req.email, missing)?;
    let password = require(req.password, missing)?;

    let user = ctx.accounts.register(&name, &email, &password).await?;

    Ok((
        StatusCode::CREATED,
        Envelope::with_data(
            "User registration successful! Please verify your email.",
            user,
        ),
    ))
}

/// Email verification endpoint; the code carries the account id
async fn verify_email(
    State(ctx): State<AppContext>,
    Json(req): Json<VerifyEmailRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    let code = require(req.code, "Provide the verification code")?;

    let message = match ctx.accounts.verify_email(&code).await? {
        EmailVerification::Verified => "Email verification successful!",
        EmailVerification::AlreadyVerified => "Email is already verified.",
    };

    Ok(Envelope::message(message))
}

/// Login endpoint; sets the token pair as cookies and returns it in the body
async fn login(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<Envelope<TokenPair>>)> {
    let missing = "Email and password are required";
    let email = require(req.email, missing)?;
    let password = require(req.password, missing)?;

    let pair = ctx.accounts.login(&email, &password).await?;

    let jar = jar
        .add(auth_cookie(ACCESS_TOKEN_COOKIE, pair.access_token.clone()))
        .add(auth_cookie(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone()));

    Ok((jar, Envelope::with_data("Login successful!", pair)))
}

/// Logout endpoint
///
/// Cookies are cleared even when the account has vanished between the
/// gate and the store update.
async fn logout(
    State(ctx): State<AppContext>,
    AuthUser { user_id }: AuthUser,
    jar: CookieJar,
) -> Response {
    let jar = jar
        .remove(removal_cookie(ACCESS_TOKEN_COOKIE))
        .remove(removal_cookie(REFRESH_TOKEN_COOKIE));

    match ctx.accounts.logout(&user_id).await {
        Ok(()) => (jar, Envelope::message("Logout successful.")).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

/// Avatar upload endpoint
async fn upload_avatar(
    State(ctx): State<AppContext>,
    AuthUser { user_id }: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Envelope<AvatarData>>> {
    let payload = ImagePayload::from_multipart(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::Validation("No image file uploaded".to_string()))?;

    let stored = ctx.media.store_image(payload, &user_id).await?;
    ctx.accounts.set_avatar(&user_id, &stored.url).await?;

    Ok(Envelope::with_data(
        "Profile avatar uploaded successfully",
        AvatarData {
            id: user_id,
            avatar: stored.url,
        },
    ))
}

/// Profile update endpoint
async fn update_user(
    State(ctx): State<AppContext>,
    AuthUser { user_id }: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Envelope<User>>> {
    req.validate()
        .map_err(|_| ApiError::Validation("Provide a valid email address".to_string()))?;

    let user = ctx.accounts.update_profile(&user_id, req).await?;

    Ok(Envelope::with_data("User updated successfully", user))
}

/// Forgotten-password endpoint
async fn forgot_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    let email = require(req.email, "Email is required")?;

    ctx.accounts.forgot_password(&email).await?;

    Ok(Envelope::message("OTP has been sent to your email"))
}

/// OTP verification endpoint; advisory, records nothing
async fn verify_otp(
    State(ctx): State<AppContext>,
    Json(req): Json<VerifyOtpRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    let missing = "Email and OTP are required";
    let email = require(req.email, missing)?;
    let otp = req
        .otp
        .map(|o| o.into_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation(missing.to_string()))?;

    ctx.accounts.verify_otp(&email, &otp).await?;

    Ok(Envelope::message("OTP verification successful"))
}

/// Password reset endpoint
async fn reset_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    let missing = "Email and passwords are required";
    let email = require(req.email, missing)?;
    let new_password = require(req.new_password, missing)?;
    let confirm_password = require(req.confirm_password, missing)?;

    ctx.accounts
        .reset_password(&email, &new_password, &confirm_password)
        .await?;

    Ok(Envelope::message("Password updated successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_missing_and_empty_values() {
        assert!(require(None, "msg").is_err());
        assert!(require(Some(String::new()), "msg").is_err());
        assert_eq!(require(Some("x".to_string()), "msg").unwrap(), "x");
    }

    #[test]
    fn session_cookies_are_locked_down() {
        let cookie = auth_cookie(ACCESS_TOKEN_COOKIE, "tok".to_string());

        assert_eq!(cookie.name(), "accessToken");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
    }
}
