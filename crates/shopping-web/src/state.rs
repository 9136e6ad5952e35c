//! Application state shared across handlers.

use shopping_list::{Database, ShoppingList};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The shopping list backing every route.
    pub list: ShoppingList,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: &Database) -> Self {
        Self {
            list: db.shopping_list(),
        }
    }
}
