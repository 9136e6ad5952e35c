//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shopping_list::ShoppingListError;
use thiserror::Error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error from the shopping list.
    #[error("{0}")]
    ShoppingList(#[from] ShoppingListError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::ShoppingList(err) => match err {
                ShoppingListError::NotFound { .. } => StatusCode::NOT_FOUND,
                ShoppingListError::InvalidMove { .. }
                | ShoppingListError::InvalidDirection(_)
                | ShoppingListError::Validation(_) => StatusCode::BAD_REQUEST,
                ShoppingListError::Sqlx(_) | ShoppingListError::Migration(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!(status = %status, "Request rejected: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
