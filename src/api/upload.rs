/// /api/file/* endpoints: image upload and serving
use crate::{
    api::Envelope,
    auth::AuthUser,
    context::AppContext,
    error::{ApiError, ApiResult},
    media::{ImagePayload, StoredImage},
};
use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::Response,
    routing::{get, post},
    Json, Router,
};

/// Build upload routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/file/upload", post(upload_image))
        .route("/api/file/:id", get(get_image))
}

/// Upload an image and return its public reference
async fn upload_image(
    State(ctx): State<AppContext>,
    AuthUser { user_id }: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Envelope<StoredImage>>> {
    let payload = ImagePayload::from_multipart(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    let stored = ctx.media.store_image(payload, &user_id).await?;

    Ok(Envelope::with_data("Image uploaded successfully", stored))
}

/// Serve stored image bytes with their recorded mime type
async fn get_image(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let (data, mime_type) = ctx
        .media
        .fetch(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Image not found".to_string()))?;

    Response::builder()
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(axum::body::Body::from(data))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
