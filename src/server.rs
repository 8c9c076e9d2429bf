/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Build the main application router
pub fn build_router(ctx: AppContext) -> ApiResult<Router> {
    // The frontend is the only allowed origin; cookies require credentials
    let origin = ctx
        .config
        .service
        .frontend_url
        .parse::<HeaderValue>()
        .map_err(|_| {
            ApiError::Validation("FRONTEND_URL is not a valid origin".to_string())
        })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .with_state(ctx)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .fallback(not_found);

    Ok(router)
}

/// Root handler
async fn root(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(json!({
        "message": format!("Server is running on {}", ctx.config.service.port),
    }))
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Endpoint not found",
            "error": true,
            "success": false,
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ApiResult<()> {
    let addr = format!(
        "{}:{}",
        ctx.config.service.hostname, ctx.config.service.port
    );

    info!("QuickCart API listening on {}", addr);
    info!("   Allowed origin: {}", ctx.config.service.frontend_url);

    let app = build_router(ctx)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
