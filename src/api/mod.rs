/// API routes and handlers
pub mod catalog;
pub mod upload;
pub mod user;

use crate::context::AppContext;
use axum::{Json, Router};
use serde::Serialize;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(user::routes())
        .merge(catalog::routes())
        .merge(upload::routes())
}

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub error: bool,
    pub success: bool,
}

impl<T: Serialize> Envelope<T> {
    /// Successful response carrying a payload
    pub fn with_data(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            message: message.into(),
            data: Some(data),
            error: false,
            success: true,
        })
    }
}

impl Envelope<()> {
    /// Successful response without a payload
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
            data: None,
            error: false,
            success: true,
        })
    }
}
