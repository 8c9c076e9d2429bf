/// Configuration management for the QuickCart server
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub email: Option<EmailConfig>,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    /// Origin allowed by CORS and base of links embedded in emails
    pub frontend_url: String,
    /// Base URL under which this server is reachable, used for stored image URLs
    pub public_url: String,
    pub upload_limit: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
    pub media_directory: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret for the short-lived access token signing context
    pub access_token_secret: String,
    /// Secret for the long-lived refresh token signing context
    pub refresh_token_secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_days: i64,
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from_address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", hostname, port));
        let upload_limit = env::var("UPLOAD_LIMIT")
            .unwrap_or_else(|_| "5242880".to_string())
            .parse()
            .unwrap_or(5242880);

        let data_directory: PathBuf = env::var("DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("DATABASE_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("quickcart.sqlite"));
        let media_directory = env::var("MEDIA_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("media"));

        // Both token secrets must be present at startup
        let access_token_secret = env::var("SECRET_KEY_ACCESS_TOKEN").map_err(|_| {
            ApiError::Validation("SECRET_KEY_ACCESS_TOKEN is required".to_string())
        })?;
        let refresh_token_secret = env::var("SECRET_KEY_REFRESH_TOKEN").map_err(|_| {
            ApiError::Validation("SECRET_KEY_REFRESH_TOKEN is required".to_string())
        })?;

        let access_token_ttl_hours = env::var("ACCESS_TOKEN_EXPIRE_HOURS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let refresh_token_ttl_days = env::var("REFRESH_TOKEN_EXPIRE_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7);

        let email = if let Ok(smtp_url) = env::var("SMTP_URL") {
            Some(EmailConfig {
                smtp_url,
                from_address: env::var("EMAIL_FROM_ADDRESS")
                    .unwrap_or_else(|_| format!("noreply@{}", hostname)),
            })
        } else {
            None
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                frontend_url,
                public_url,
                upload_limit,
            },
            storage: StorageConfig {
                data_directory,
                database,
                media_directory,
            },
            auth: AuthConfig {
                access_token_secret,
                refresh_token_secret,
                access_token_ttl_hours,
                refresh_token_ttl_days,
            },
            email,
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.auth.access_token_secret.len() < 16 {
            return Err(ApiError::Validation(
                "SECRET_KEY_ACCESS_TOKEN must be at least 16 characters".to_string(),
            ));
        }

        if self.auth.refresh_token_secret.len() < 16 {
            return Err(ApiError::Validation(
                "SECRET_KEY_REFRESH_TOKEN must be at least 16 characters".to_string(),
            ));
        }

        if self.service.frontend_url.is_empty() {
            return Err(ApiError::Validation(
                "Frontend URL cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 8080,
                frontend_url: "http://localhost:5173".to_string(),
                public_url: "http://localhost:8080".to_string(),
                upload_limit: 5242880,
            },
            storage: StorageConfig {
                data_directory: "./data".into(),
                database: "./data/quickcart.sqlite".into(),
                media_directory: "./data/media".into(),
            },
            auth: AuthConfig {
                access_token_secret: "access-secret-0123456789".to_string(),
                refresh_token_secret: "refresh-secret-0123456789".to_string(),
                access_token_ttl_hours: 5,
                refresh_token_ttl_days: 7,
            },
            email: None,
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn short_secrets_are_rejected() {
        let mut config = test_config();
        config.auth.access_token_secret = "short".to_string();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.auth.refresh_token_secret = "short".to_string();
        assert!(config.validate().is_err());
    }
}
