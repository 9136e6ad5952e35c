//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use shopping_list::ListCounts;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ListCounts>,
}

/// Health check endpoint. Reports 503 when the database is unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.list.counts().await {
        Ok(counts) => (
            StatusCode::OK,
            Json(Health {
                status: "ok".to_string(),
                items: Some(counts),
            }),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Health {
                    status: "unavailable".to_string(),
                    items: None,
                }),
            )
        }
    }
}
