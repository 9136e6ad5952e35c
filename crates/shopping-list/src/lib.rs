//! SQLite persistence and list ordering for the shopping list manager.
//!
//! Items live on one of two lists: the to-buy list, split into an important
//! and a regular partition that are each ordered independently, and the
//! previously-bought history. [`ShoppingList`] owns every operation that
//! changes an item's position.
//!
//! # Example
//!
//! ```no_run
//! use shopping_list::{Database, Direction, NewItem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:shopping.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let list = db.shopping_list();
//!     list.add_to_buy(NewItem::new("Milk", 2)).await?;
//!     let bread = list.add_to_buy(NewItem::new("Bread", 1)).await?;
//!
//!     // Manual reordering switches the list to custom order
//!     list.move_item(&bread.id, Direction::Up).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
mod item;
pub mod models;
mod settings;
pub mod shopping_list;
pub mod validation;

pub use error::{Result, ShoppingListError};
pub use models::{Direction, Item, ListType, NewItem, SortMode};
pub use shopping_list::{ListCounts, ShoppingList};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    list: ShoppingList,
}

impl Database {
    /// Default pool size for database connections.
    pub const DEFAULT_POOL_SIZE: u32 = 5;

    /// How long a connection waits on another process's write lock.
    const BUSY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> shopping_list::Result<()> {
    /// // File database
    /// let db = shopping_list::Database::connect("sqlite:data/shopping.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing, keep the pool to one connection)
    /// let db = shopping_list::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(Self::BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        let list = ShoppingList::new(pool.clone());
        Ok(Self { pool, list })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The shopping list stored in this database. Every call returns a
    /// handle sharing the same write lock.
    pub fn shopping_list(&self) -> ShoppingList {
        self.list.clone()
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
