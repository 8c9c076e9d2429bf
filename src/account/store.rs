/// User persistence
///
/// Every mutation is a single-row UPDATE; the unique index on email is
/// the source of truth for duplicate detection.
use crate::{
    db::user::{User, UserPatch},
    error::{ApiError, ApiResult},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// The unique index on email is the source of truth for duplicates
fn map_unique_violation(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return ApiError::DuplicateEmail;
        }
    }
    ApiError::Database(e)
}

#[derive(Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new account
    ///
    /// Fails with `DuplicateEmail` when the unique index rejects the row.
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> ApiResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, avatar, refresh_token, verify_email, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, '', '', FALSE, 'Active', ?5, ?6)",
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(map_unique_violation)?;

        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            avatar: String::new(),
            mobile: None,
            refresh_token: String::new(),
            verify_email: false,
            status: crate::db::user::UserStatus::Active,
            forgot_password_otp: None,
            forgot_password_expiry: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(user)
    }

    /// Best-effort duplicate pre-check before insert
    pub async fn email_exists(&self, email: &str) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    /// Store the session credential; last login wins
    pub async fn set_refresh_token(&self, id: &str, refresh_token: &str) -> ApiResult<bool> {
        let result =
            sqlx::query("UPDATE users SET refresh_token = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(refresh_token)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear the session credential, invalidating the active session
    pub async fn clear_refresh_token(&self, id: &str) -> ApiResult<bool> {
        self.set_refresh_token(id, "").await
    }

    /// One-way transition of the verification flag
    pub async fn mark_email_verified(&self, id: &str) -> ApiResult<bool> {
        let result =
            sqlx::query("UPDATE users SET verify_email = TRUE, updated_at = ?1 WHERE id = ?2")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a pending password reset; both fields are written together
    pub async fn set_password_reset_otp(
        &self,
        id: &str,
        otp: &str,
        expiry: DateTime<Utc>,
    ) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET forgot_password_otp = ?1, forgot_password_expiry = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(otp)
        .bind(expiry)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the password hash and clear the pending reset in one UPDATE
    pub async fn reset_password(&self, id: &str, password_hash: &str) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?1, forgot_password_otp = NULL, forgot_password_expiry = NULL, updated_at = ?2 WHERE id = ?3",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_avatar(&self, id: &str, avatar: &str) -> ApiResult<bool> {
        let result = sqlx::query("UPDATE users SET avatar = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(avatar)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply a partial profile update and return the new row
    ///
    /// Only the columns present in the patch are touched.
    pub async fn update_profile(&self, id: &str, patch: &UserPatch) -> ApiResult<Option<User>> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE users SET ");
        let mut fields = builder.separated(", ");

        if let Some(name) = &patch.name {
            fields.push("name = ");
            fields.push_bind_unseparated(name);
        }
        if let Some(email) = &patch.email {
            fields.push("email = ");
            fields.push_bind_unseparated(email);
        }
        if let Some(mobile) = &patch.mobile {
            fields.push("mobile = ");
            fields.push_bind_unseparated(mobile);
        }
        if let Some(password_hash) = &patch.password_hash {
            fields.push("password_hash = ");
            fields.push_bind_unseparated(password_hash);
        }
        fields.push("updated_at = ");
        fields.push_bind_unseparated(Utc::now());

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        builder
            .build()
            .execute(&self.db)
            .await
            .map_err(map_unique_violation)?;

        self.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::user::UserStatus;

    async fn test_store() -> UserStore {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        UserStore::new(pool)
    }

    #[tokio::test]
    async fn create_and_find_round_trips() {
        let store = test_store().await;

        let created = store
            .create("Alice", "alice@example.com", "hash-1")
            .await
            .unwrap();
        assert_eq!(created.status, UserStatus::Active);
        assert!(!created.verify_email);
        assert_eq!(created.refresh_token, "");

        let by_email = store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_the_index() {
        let store = test_store().await;

        store
            .create("Alice", "alice@example.com", "hash-1")
            .await
            .unwrap();
        let err = store
            .create("Alice Again", "alice@example.com", "hash-2")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail));

        // Exactly one account exists afterwards
        assert!(store.email_exists("alice@example.com").await.unwrap());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&store.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn refresh_token_set_and_clear() {
        let store = test_store().await;
        let user = store
            .create("Alice", "alice@example.com", "hash-1")
            .await
            .unwrap();

        assert!(store.set_refresh_token(&user.id, "tok-1").await.unwrap());
        let reloaded = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.refresh_token, "tok-1");

        assert!(store.clear_refresh_token(&user.id).await.unwrap());
        let reloaded = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.refresh_token, "");

        // Unknown ids report no row touched
        assert!(!store.set_refresh_token("missing", "tok").await.unwrap());
    }

    #[tokio::test]
    async fn reset_password_clears_recovery_fields() {
        let store = test_store().await;
        let user = store
            .create("Alice", "alice@example.com", "hash-1")
            .await
            .unwrap();

        let expiry = Utc::now() + chrono::Duration::hours(1);
        store
            .set_password_reset_otp(&user.id, "123456", expiry)
            .await
            .unwrap();

        let pending = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(pending.forgot_password_otp.as_deref(), Some("123456"));
        assert!(pending.forgot_password_expiry.is_some());

        store.reset_password(&user.id, "hash-2").await.unwrap();

        let after = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(after.password_hash, "hash-2");
        assert!(after.forgot_password_otp.is_none());
        assert!(after.forgot_password_expiry.is_none());
    }

    #[tokio::test]
    async fn profile_patch_touches_only_supplied_columns() {
        let store = test_store().await;
        let user = store
            .create("Alice", "alice@example.com", "hash-1")
            .await
            .unwrap();

        let patch = UserPatch {
            mobile: Some("555-0100".to_string()),
            ..Default::default()
        };
        let updated = store
            .update_profile(&user.id, &patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.mobile.as_deref(), Some("555-0100"));
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.password_hash, "hash-1");
    }

    #[tokio::test]
    async fn empty_patch_returns_current_row() {
        let store = test_store().await;
        let user = store
            .create("Alice", "alice@example.com", "hash-1")
            .await
            .unwrap();

        let unchanged = store
            .update_profile(&user.id, &UserPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.name, "Alice");
    }
}
