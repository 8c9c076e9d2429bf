/// Application context and dependency injection
use crate::{
    account::{AccountService, UserStore},
    auth::TokenIssuer,
    catalog::{CategoryStore, SubCategoryStore},
    config::ServerConfig,
    db,
    error::{ApiError, ApiResult},
    mailer::Mailer,
    media::{disk::DiskMediaBackend, MediaBackend, MediaStore},
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub tokens: Arc<TokenIssuer>,
    pub accounts: Arc<AccountService>,
    pub mailer: Arc<Mailer>,
    pub media: Arc<MediaStore>,
    pub categories: Arc<CategoryStore>,
    pub subcategories: Arc<SubCategoryStore>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        // Validate configuration
        config.validate()?;

        // Create data directories if they don't exist
        Self::ensure_directories(&config).await?;

        // Initialize the database
        let db = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;

        // Run migrations
        db::run_migrations(&db).await?;

        // Test connection
        db::test_connection(&db).await?;

        // Initialize the token issuer and mailer
        let tokens = Arc::new(TokenIssuer::new(&config.auth));
        let mailer = Arc::new(Mailer::new(config.email.clone())?);

        // Initialize media storage
        let backend: Arc<dyn MediaBackend> =
            Arc::new(DiskMediaBackend::new(config.storage.media_directory.clone()));
        let media = Arc::new(MediaStore::new(
            backend,
            db.clone(),
            config.service.public_url.clone(),
        ));

        // Initialize the account lifecycle service
        let accounts = Arc::new(AccountService::new(
            UserStore::new(db.clone()),
            Arc::clone(&tokens),
            Arc::clone(&mailer),
            config.service.frontend_url.clone(),
        ));

        // Initialize catalog managers
        let categories = Arc::new(CategoryStore::new(db.clone()));
        let subcategories = Arc::new(SubCategoryStore::new(db.clone()));

        Ok(Self {
            config: Arc::new(config),
            db,
            tokens,
            accounts,
            mailer,
            media,
            categories,
            subcategories,
        })
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> ApiResult<()> {
        let dirs = [
            &config.storage.data_directory,
            &config.storage.media_directory,
        ];

        for dir in dirs {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    ApiError::Internal(format!("Failed to create directory {:?}: {}", dir, e))
                })?;
            }
        }

        Ok(())
    }
}
