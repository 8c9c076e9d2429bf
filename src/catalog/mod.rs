/// Catalog management
///
/// Categories and subcategories with their request/response types.

pub mod store;

pub use store::{CategoryStore, SubCategoryStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Subcategory record with its linked category ids
#[derive(Debug, Clone, Serialize)]
pub struct SubCategory {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AddCategoryRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCategoryRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSubCategoryRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubCategoryRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSubCategoryRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}
