//! Route handlers for the HTTP API.

pub mod health;
pub mod shopping_list;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .nest("/api/ShoppingList", shopping_list::router())
}
