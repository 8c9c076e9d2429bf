/// Authentication extractor and credential utilities
///
/// The gate is stateless: it resolves a bearer token to an account id
/// through the token issuer and never touches the store.

pub mod otp;
pub mod password;
pub mod token;

pub use token::{TokenIssuer, TokenKind};

use crate::{context::AppContext, error::ApiError};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Resolved identity of an authenticated request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Extract a bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Extract the access token; the cookie takes precedence over the header
pub fn extract_access_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| extract_bearer_token(headers))
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = extract_access_token(&jar, &parts.headers).ok_or_else(|| {
            ApiError::Unauthorized("Access denied. No token provided.".to_string())
        })?;

        let user_id = state.tokens.verify(&token, TokenKind::Access)?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer abc123token"),
        );

        assert_eq!(
            extract_bearer_token(&headers),
            Some("abc123token".to_string())
        );
    }

    #[test]
    fn header_without_bearer_scheme_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("abc123token"));

        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn cookie_takes_precedence_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("accessToken=from-cookie"),
        );
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer from-header"),
        );

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(
            extract_access_token(&jar, &headers),
            Some("from-cookie".to_string())
        );
    }

    #[test]
    fn header_is_used_when_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer from-header"),
        );

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(
            extract_access_token(&jar, &headers),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn missing_credentials_yield_none() {
        let headers = HeaderMap::new();
        let jar = CookieJar::from_headers(&headers);

        assert_eq!(extract_access_token(&jar, &headers), None);
    }
}
