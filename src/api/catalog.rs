/// /api/category/* and /api/subcategory/* endpoints
use crate::{
    api::Envelope,
    auth::AuthUser,
    catalog::{
        AddCategoryRequest, AddSubCategoryRequest, Category, DeleteCategoryRequest,
        DeleteSubCategoryRequest, SubCategory, UpdateCategoryRequest, UpdateSubCategoryRequest,
    },
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

/// Build catalog routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/category/add", post(add_category))
        .route("/api/category/get", get(get_categories))
        .route("/api/category/update", put(update_category))
        .route("/api/category/delete", delete(delete_category))
        .route("/api/subcategory/add", post(add_subcategory))
        .route("/api/subcategory/get", get(get_subcategories))
        .route("/api/subcategory/update", put(update_subcategory))
        .route("/api/subcategory/delete", delete(delete_subcategory))
}

fn nonempty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Add category endpoint
async fn add_category(
    State(ctx): State<AppContext>,
    _auth: AuthUser,
    Json(req): Json<AddCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Category>>)> {
    let (name, image) = match (nonempty(req.name), nonempty(req.image)) {
        (Some(name), Some(image)) => (name, image),
        _ => {
            return Err(ApiError::Validation(
                "Provide both name and image for the category".to_string(),
            ))
        }
    };

    let category = ctx.categories.add(&name, &image).await?;

    Ok((
        StatusCode::CREATED,
        Envelope::with_data("Category created successfully", category),
    ))
}

/// List categories endpoint
async fn get_categories(
    State(ctx): State<AppContext>,
) -> ApiResult<Json<Envelope<Vec<Category>>>> {
    let categories = ctx.categories.list().await?;

    Ok(Envelope::with_data(
        "Categories fetched successfully",
        categories,
    ))
}

/// Update category endpoint
async fn update_category(
    State(ctx): State<AppContext>,
    _auth: AuthUser,
    Json(req): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<Envelope<Category>>> {
    let id = nonempty(req.id)
        .ok_or_else(|| ApiError::Validation("Provide the category id".to_string()))?;

    let category = ctx
        .categories
        .update(&id, nonempty(req.name).as_deref(), nonempty(req.image).as_deref())
        .await?;

    Ok(Envelope::with_data("Category updated successfully", category))
}

/// Delete category endpoint
async fn delete_category(
    State(ctx): State<AppContext>,
    _auth: AuthUser,
    Json(req): Json<DeleteCategoryRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    let id = nonempty(req.id)
        .ok_or_else(|| ApiError::Validation("Provide the category id".to_string()))?;

    ctx.categories.delete(&id).await?;

    Ok(Envelope::message("Category deleted successfully"))
}

/// Add subcategory endpoint
async fn add_subcategory(
    State(ctx): State<AppContext>,
    _auth: AuthUser,
    Json(req): Json<AddSubCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<SubCategory>>)> {
    let name = nonempty(req.name);
    let image = nonempty(req.image);
    let category = req.category.filter(|ids| !ids.is_empty());

    let (name, image, category) = match (name, image, category) {
        (Some(name), Some(image), Some(category)) => (name, image, category),
        _ => {
            return Err(ApiError::Validation(
                "Provide name, image, and category".to_string(),
            ))
        }
    };

    let subcategory = ctx.subcategories.add(&name, &image, &category).await?;

    Ok((
        StatusCode::CREATED,
        Envelope::with_data("Subcategory created successfully", subcategory),
    ))
}

/// List subcategories endpoint
async fn get_subcategories(
    State(ctx): State<AppContext>,
) -> ApiResult<Json<Envelope<Vec<SubCategory>>>> {
    let subcategories = ctx.subcategories.list().await?;

    Ok(Envelope::with_data(
        "Subcategories fetched successfully",
        subcategories,
    ))
}

/// Update subcategory endpoint
async fn update_subcategory(
    State(ctx): State<AppContext>,
    _auth: AuthUser,
    Json(req): Json<UpdateSubCategoryRequest>,
) -> ApiResult<Json<Envelope<SubCategory>>> {
    let id = nonempty(req.id)
        .ok_or_else(|| ApiError::Validation("Provide the subcategory id".to_string()))?;

    let subcategory = ctx
        .subcategories
        .update(
            &id,
            nonempty(req.name).as_deref(),
            nonempty(req.image).as_deref(),
            req.category.as_deref(),
        )
        .await?;

    Ok(Envelope::with_data(
        "Subcategory updated successfully",
        subcategory,
    ))
}

/// Delete subcategory endpoint
async fn delete_subcategory(
    State(ctx): State<AppContext>,
    _auth: AuthUser,
    Json(req): Json<DeleteSubCategoryRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    let id = nonempty(req.id)
        .ok_or_else(|| ApiError::Validation("Provide the subcategory id".to_string()))?;

    ctx.subcategories.delete(&id).await?;

    Ok(Envelope::message("Subcategory deleted successfully"))
}
