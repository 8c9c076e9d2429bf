/// Catalog persistence
use crate::{
    catalog::{Category, SubCategory},
    error::{ApiError, ApiResult},
};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

fn map_duplicate_name(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return ApiError::Conflict("Category with this name already exists".to_string());
        }
    }
    ApiError::Database(e)
}

fn map_unknown_category(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return ApiError::Validation("Provide valid category ids".to_string());
        }
    }
    ApiError::Database(e)
}

/// Category manager
#[derive(Clone)]
pub struct CategoryStore {
    db: SqlitePool,
}

impl CategoryStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new category; names are unique
    pub async fn add(&self, name: &str, image: &str) -> ApiResult<Category> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO categories (id, name, image, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&id)
        .bind(name)
        .bind(image)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(map_duplicate_name)?;

        Ok(Category {
            id,
            name: name.to_string(),
            image: image.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY created_at DESC")
                .fetch_all(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> ApiResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(category)
    }

    /// Update name and/or image, returning the new row
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        image: Option<&str>,
    ) -> ApiResult<Category> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

        let name = name.unwrap_or(&current.name);
        let image = image.unwrap_or(&current.image);
        let now = Utc::now();

        sqlx::query("UPDATE categories SET name = ?1, image = ?2, updated_at = ?3 WHERE id = ?4")
            .bind(name)
            .bind(image)
            .bind(now)
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(map_duplicate_name)?;

        Ok(Category {
            id: current.id,
            name: name.to_string(),
            image: image.to_string(),
            created_at: current.created_at,
            updated_at: now,
        })
    }

    /// Delete a category that no subcategory links anymore
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let linked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subcategory_categories WHERE category_id = ?1",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if linked > 0 {
            return Err(ApiError::Conflict(
                "Category is linked with a subcategory and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Category not found".to_string()));
        }

        Ok(())
    }
}

/// Subcategory manager
#[derive(Clone)]
pub struct SubCategoryStore {
    db: SqlitePool,
}

impl SubCategoryStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a subcategory linked to at least one category
    pub async fn add(&self, name: &str, image: &str, category_ids: &[String]) -> ApiResult<SubCategory> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.db.begin().await.map_err(ApiError::Database)?;

        sqlx::query(
            "INSERT INTO subcategories (id, name, image, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&id)
        .bind(name)
        .bind(image)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Database)?;

        for category_id in category_ids {
            sqlx::query(
                "INSERT INTO subcategory_categories (subcategory_id, category_id) VALUES (?1, ?2)",
            )
            .bind(&id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .map_err(map_unknown_category)?;
        }

        tx.commit().await.map_err(ApiError::Database)?;

        Ok(SubCategory {
            id,
            name: name.to_string(),
            image: image.to_string(),
            category: category_ids.to_vec(),
            created_at: now,
            updated_at: now,
        })
    }

    /// List all subcategories with their linked category ids
    pub async fn list(&self) -> ApiResult<Vec<SubCategory>> {
        let rows = sqlx::query(
            "SELECT id, name, image, created_at, updated_at FROM subcategories ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let links = sqlx::query("SELECT subcategory_id, category_id FROM subcategory_categories")
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::Database)?;

        let mut by_subcategory: HashMap<String, Vec<String>> = HashMap::new();
        for link in links {
            let subcategory_id: String = link.get("subcategory_id");
            let category_id: String = link.get("category_id");
            by_subcategory
                .entry(subcategory_id)
                .or_default()
                .push(category_id);
        }

        let subcategories = rows
            .into_iter()
            .map(|row| {
                let id: String = row.get("id");
                let category = by_subcategory.remove(&id).unwrap_or_default();
                SubCategory {
                    id,
                    name: row.get("name"),
                    image: row.get("image"),
                    category,
                    created_at: row.get::<DateTime<Utc>, _>("created_at"),
                    updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
                }
            })
            .collect();

        Ok(subcategories)
    }

    async fn find_row(&self, id: &str) -> ApiResult<Option<(String, String, DateTime<Utc>)>> {
        let row = sqlx::query(
            "SELECT name, image, created_at FROM subcategories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(row.map(|row| (row.get("name"), row.get("image"), row.get("created_at"))))
    }

    /// Update fields and/or replace category links, returning the new row
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        image: Option<&str>,
        category_ids: Option<&[String]>,
    ) -> ApiResult<SubCategory> {
        let (current_name, current_image, created_at) = self
            .find_row(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Subcategory not found".to_string()))?;

        let name = name.unwrap_or(&current_name);
        let image = image.unwrap_or(&current_image);
        let now = Utc::now();

        let mut tx = self.db.begin().await.map_err(ApiError::Database)?;

        sqlx::query("UPDATE subcategories SET name = ?1, image = ?2, updated_at = ?3 WHERE id = ?4")
            .bind(name)
            .bind(image)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::Database)?;

        if let Some(category_ids) = category_ids {
            sqlx::query("DELETE FROM subcategory_categories WHERE subcategory_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::Database)?;

            for category_id in category_ids {
                sqlx::query(
                    "INSERT INTO subcategory_categories (subcategory_id, category_id) VALUES (?1, ?2)",
                )
                .bind(id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(map_unknown_category)?;
            }
        }

        tx.commit().await.map_err(ApiError::Database)?;

        let category = match category_ids {
            Some(ids) => ids.to_vec(),
            None => {
                let links = sqlx::query(
                    "SELECT category_id FROM subcategory_categories WHERE subcategory_id = ?1",
                )
                .bind(id)
                .fetch_all(&self.db)
                .await
                .map_err(ApiError::Database)?;
                links.into_iter().map(|row| row.get("category_id")).collect()
            }
        };

        Ok(SubCategory {
            id: id.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            category,
            created_at,
            updated_at: now,
        })
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let mut tx = self.db.begin().await.map_err(ApiError::Database)?;

        sqlx::query("DELETE FROM subcategory_categories WHERE subcategory_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::Database)?;

        let result = sqlx::query("DELETE FROM subcategories WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Subcategory not found".to_string()));
        }

        tx.commit().await.map_err(ApiError::Database)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_stores() -> (CategoryStore, SubCategoryStore) {
        use std::str::FromStr;

        // Link integrity checks rely on foreign key enforcement
        let options = sqlx::sqlite::SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        (
            CategoryStore::new(pool.clone()),
            SubCategoryStore::new(pool),
        )
    }

    #[tokio::test]
    async fn duplicate_category_name_conflicts() {
        let (categories, _) = test_stores().await;

        categories.add("Dairy", "http://img/dairy.png").await.unwrap();
        let err = categories
            .add("Dairy", "http://img/other.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        assert_eq!(categories.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn category_update_keeps_unspecified_fields() {
        let (categories, _) = test_stores().await;

        let dairy = categories.add("Dairy", "http://img/dairy.png").await.unwrap();
        let updated = categories
            .update(&dairy.id, Some("Dairy & Eggs"), None)
            .await
            .unwrap();

        assert_eq!(updated.name, "Dairy & Eggs");
        assert_eq!(updated.image, "http://img/dairy.png");

        let err = categories
            .update("no-such-id", Some("x"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn linked_category_cannot_be_deleted() {
        let (categories, subcategories) = test_stores().await;

        let dairy = categories.add("Dairy", "http://img/dairy.png").await.unwrap();
        subcategories
            .add("Milk", "http://img/milk.png", &[dairy.id.clone()])
            .await
            .unwrap();

        let err = categories.delete(&dairy.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // After the subcategory goes away the category can be deleted
        let subs = subcategories.list().await.unwrap();
        subcategories.delete(&subs[0].id).await.unwrap();
        categories.delete(&dairy.id).await.unwrap();
        assert!(categories.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn subcategory_lists_its_linked_categories() {
        let (categories, subcategories) = test_stores().await;

        let dairy = categories.add("Dairy", "i1").await.unwrap();
        let breakfast = categories.add("Breakfast", "i2").await.unwrap();

        subcategories
            .add("Milk", "i3", &[dairy.id.clone(), breakfast.id.clone()])
            .await
            .unwrap();

        let subs = subcategories.list().await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].name, "Milk");
        assert_eq!(subs[0].category.len(), 2);
        assert!(subs[0].category.contains(&dairy.id));
        assert!(subs[0].category.contains(&breakfast.id));
    }

    #[tokio::test]
    async fn subcategory_with_unknown_category_is_rejected() {
        let (_, subcategories) = test_stores().await;

        let err = subcategories
            .add("Milk", "i1", &["missing-category".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // The failed insert leaves nothing behind
        assert!(subcategories.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn subcategory_update_replaces_links() {
        let (categories, subcategories) = test_stores().await;

        let dairy = categories.add("Dairy", "i1").await.unwrap();
        let breakfast = categories.add("Breakfast", "i2").await.unwrap();

        let milk = subcategories
            .add("Milk", "i3", &[dairy.id.clone()])
            .await
            .unwrap();

        let updated = subcategories
            .update(&milk.id, None, None, Some(&[breakfast.id.clone()]))
            .await
            .unwrap();

        assert_eq!(updated.name, "Milk");
        assert_eq!(updated.category, vec![breakfast.id.clone()]);

        // The old link is gone, so the old category is deletable
        categories.delete(&dairy.id).await.unwrap();
    }
}
