//! HTTP API for the shopping list manager.
//!
//! Serves the `/api/ShoppingList` endpoints and, optionally, the built
//! client from `STATIC_DIR`.

mod config;
mod error;
mod routes;
mod state;

use shopping_list::Database;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting shopping list server");

    // Connect to database
    let db = Database::connect_with_pool_size(&config.database_url, config.pool_size).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(&db);
    let repaired = state.list.reindex().await?;
    info!(repaired, "Sort order checked");

    // Build router
    let mut app = routes::router();
    if let Some(dir) = &config.static_dir {
        info!(dir = %dir.display(), "Serving client assets");
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app.layer(TraceLayer::new_for_http()).with_state(state);

    // Start server
    info!(addr = %config.addr, "Shopping list server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    db.close().await;
    Ok(())
}
