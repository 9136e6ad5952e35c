//! Error types for shopping list operations.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while reading or reordering the shopping list.
#[derive(Debug, Error)]
pub enum ShoppingListError {
    /// SQLx error (connection, query, rejected write, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The requested move would leave the item's partition.
    #[error(
        "cannot move item {id} by {direction} from position {sort_order} \
         (partition holds {partition_size} items)"
    )]
    InvalidMove {
        id: String,
        sort_order: i64,
        direction: i64,
        partition_size: i64,
    },

    /// A move direction other than +1 or -1.
    #[error("invalid move direction: {0} (expected 1 or -1)")]
    InvalidDirection(i64),

    /// Rejected input.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl ShoppingListError {
    /// Whether the error comes from the store itself rather than the request.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            ShoppingListError::Sqlx(_) | ShoppingListError::Migration(_)
        )
    }

    pub(crate) fn item_not_found(id: &str) -> Self {
        ShoppingListError::NotFound {
            entity: "Item",
            id: id.to_string(),
        }
    }
}

/// Result type for shopping list operations.
pub type Result<T> = std::result::Result<T, ShoppingListError>;
