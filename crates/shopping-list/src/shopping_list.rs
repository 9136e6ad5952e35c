//! Ordering of the shopping list.
//!
//! Items on the to-buy list are split into two partitions by importance.
//! Within each partition `sort_order` is always exactly `0..n`, with no gaps
//! and no duplicates. History items carry `sort_order = -1`.
//!
//! Every mutating operation runs inside one transaction. Returning early
//! (including with an error) drops the transaction, which rolls it back, so
//! no partially shifted partition is ever committed.
//!
//! Writers that share a [`ShoppingList`] (and its clones) take a write lock
//! before opening their transaction, so they queue instead of failing with
//! `SQLITE_BUSY` when two deferred transactions both try to upgrade.

use std::sync::Arc;

use serde::Serialize;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, ShoppingListError};
use crate::models::{Direction, Item, ListType, NewItem, SortMode, UNORDERED};
use crate::validation::{merged_amount, validate_amount, validate_name};
use crate::{item, settings};

/// Item totals per list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCounts {
    pub to_buy: i64,
    pub prev_bought: i64,
}

/// The to-buy and previously-bought lists, backed by the item store.
#[derive(Debug, Clone)]
pub struct ShoppingList {
    pool: SqlitePool,
    writes: Arc<Mutex<()>>,
}

impl ShoppingList {
    /// Wrap an existing connection pool. The schema must already be migrated.
    ///
    /// Clone the result rather than calling `new` again; only clones share
    /// the write lock.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Take the write lock, then open a transaction.
    ///
    /// Bind the result as `let (_write, mut tx)` so the transaction drops
    /// (and rolls back) before the lock is released.
    async fn begin_write(&self) -> Result<(MutexGuard<'_, ()>, Transaction<'static, Sqlite>)> {
        let write = self.writes.lock().await;
        let tx = self.pool.begin().await?;
        Ok((write, tx))
    }

    /// List the to-buy items: important first, then the rest.
    ///
    /// Each group is ordered by name in alphabetical mode and by `sort_order`
    /// in custom mode. `sort_mode` overrides the stored mode for this read only.
    pub async fn to_buy(&self, sort_mode: Option<SortMode>) -> Result<Vec<Item>> {
        let mut conn = self.pool.acquire().await?;
        let mode = match sort_mode {
            Some(mode) => mode,
            None => settings::get_sort_mode(&mut conn).await?,
        };

        item::list_to_buy(&mut conn, mode).await
    }

    /// List the previously bought items by name.
    pub async fn prev_bought(&self) -> Result<Vec<Item>> {
        let mut conn = self.pool.acquire().await?;
        item::list_prev_bought(&mut conn).await
    }

    /// Get an item from either list.
    pub async fn get(&self, id: &str) -> Result<Item> {
        let mut conn = self.pool.acquire().await?;
        item::get(&mut conn, id)
            .await?
            .ok_or_else(|| ShoppingListError::item_not_found(id))
    }

    /// Number of items on each list.
    pub async fn counts(&self) -> Result<ListCounts> {
        let mut conn = self.pool.acquire().await?;
        Ok(ListCounts {
            to_buy: item::count_list(&mut conn, ListType::ToBuy).await?,
            prev_bought: item::count_list(&mut conn, ListType::PrevBought).await?,
        })
    }

    /// Sort mode of the to-buy list. An empty list is always alphabetical.
    pub async fn sort_mode(&self) -> Result<SortMode> {
        let mut conn = self.pool.acquire().await?;
        if item::count_list(&mut conn, ListType::ToBuy).await? == 0 {
            return Ok(SortMode::Alphabetical);
        }
        settings::get_sort_mode(&mut conn).await
    }

    /// Add an item to the to-buy list.
    ///
    /// If an item with the same name is already on the list its amount grows
    /// by `new.amount` and its importance and position are kept. Otherwise a
    /// new item is appended to the end of its importance partition.
    pub async fn add_to_buy(&self, new: NewItem) -> Result<Item> {
        let name = validate_name(&new.name)?;
        let amount = validate_amount(new.amount)?;

        let (_write, mut tx) = self.begin_write().await?;
        let item = merge_or_insert(&mut tx, name, amount, new.is_important).await?;
        tx.commit().await?;

        Ok(item)
    }

    /// Delete an item from either list, closing the gap it leaves.
    pub async fn delete_item(&self, id: &str) -> Result<Item> {
        let (_write, mut tx) = self.begin_write().await?;

        let item = item::get(&mut tx, id)
            .await?
            .ok_or_else(|| ShoppingListError::item_not_found(id))?;
        let shifted = item::close_gap(&mut tx, &item).await?;
        item::delete(&mut tx, &item.id).await?;

        tx.commit().await?;

        debug!(id = %item.id, name = %item.name, shifted, "Deleted item");
        Ok(item)
    }

    /// Flip an item's importance, moving it to the end of the other partition.
    pub async fn toggle_importance(&self, id: &str) -> Result<Item> {
        let (_write, mut tx) = self.begin_write().await?;

        let mut item = item::get_in_list(&mut tx, id, ListType::ToBuy)
            .await?
            .ok_or_else(|| ShoppingListError::item_not_found(id))?;
        item::close_gap(&mut tx, &item).await?;

        item.is_important = !item.is_important;
        item.sort_order = item::count_partition(&mut tx, ListType::ToBuy, item.is_important).await?;
        item::update(&mut tx, &item).await?;

        tx.commit().await?;

        debug!(
            id = %item.id,
            is_important = item.is_important,
            sort_order = item.sort_order,
            "Toggled importance"
        );
        Ok(item)
    }

    /// Move a to-buy item into the history, resetting its to-buy state.
    pub async fn move_to_prev_bought(&self, id: &str) -> Result<Item> {
        let (_write, mut tx) = self.begin_write().await?;

        let mut item = item::get_in_list(&mut tx, id, ListType::ToBuy)
            .await?
            .ok_or_else(|| ShoppingListError::item_not_found(id))?;
        item::close_gap(&mut tx, &item).await?;

        item.amount = 0;
        item.list_type = ListType::PrevBought;
        item.sort_order = UNORDERED;
        item.is_important = false;
        item.current_sort_mode = SortMode::Alphabetical;
        item::update(&mut tx, &item).await?;

        tx.commit().await?;

        debug!(id = %item.id, name = %item.name, "Moved item to history");
        Ok(item)
    }

    /// Put a history item back on the to-buy list with an amount of one.
    ///
    /// Merges into a to-buy item of the same name if there is one. The
    /// history entry itself stays where it is.
    pub async fn add_from_prev_bought(&self, id: &str) -> Result<Item> {
        let (_write, mut tx) = self.begin_write().await?;

        let prev = item::get_in_list(&mut tx, id, ListType::PrevBought)
            .await?
            .ok_or_else(|| ShoppingListError::item_not_found(id))?;
        let item = merge_or_insert(&mut tx, prev.name, 1, false).await?;

        tx.commit().await?;

        Ok(item)
    }

    /// Set the sort mode of the whole to-buy list and return the list in
    /// its new order.
    pub async fn change_sort_mode(&self, mode: SortMode) -> Result<Vec<Item>> {
        let (_write, mut tx) = self.begin_write().await?;

        settings::set_sort_mode(&mut tx, mode).await?;
        let items = item::list_to_buy(&mut tx, mode).await?;

        tx.commit().await?;

        info!(mode = %mode, count = items.len(), "Changed sort mode");
        Ok(items)
    }

    /// Swap an item with its neighbour in `direction`.
    ///
    /// Manual reordering switches the list to custom mode. Returns the moved
    /// item followed by the neighbour it swapped with. A move past either
    /// end of the partition fails with [`ShoppingListError::InvalidMove`]
    /// and changes nothing, including the sort mode.
    pub async fn move_item(&self, id: &str, direction: Direction) -> Result<(Item, Item)> {
        let (_write, mut tx) = self.begin_write().await?;

        let mut item = item::get_in_list(&mut tx, id, ListType::ToBuy)
            .await?
            .ok_or_else(|| ShoppingListError::item_not_found(id))?;
        settings::set_sort_mode(&mut tx, SortMode::Custom).await?;
        item.current_sort_mode = SortMode::Custom;

        let delta = direction.delta();
        let partition_size =
            item::count_partition(&mut tx, ListType::ToBuy, item.is_important).await?;
        let target = item.sort_order + delta;
        if target < 0 || target >= partition_size {
            return Err(ShoppingListError::InvalidMove {
                id: item.id,
                sort_order: item.sort_order,
                direction: delta,
                partition_size,
            });
        }

        let mut other = item::find_at(&mut tx, ListType::ToBuy, item.is_important, target)
            .await?
            .ok_or_else(|| ShoppingListError::NotFound {
                entity: "Item",
                id: format!("position {target}"),
            })?;

        other.sort_order -= delta;
        item.sort_order += delta;
        item::update(&mut tx, &other).await?;
        item::update(&mut tx, &item).await?;

        tx.commit().await?;

        debug!(
            id = %item.id,
            sort_order = item.sort_order,
            swapped_with = %other.id,
            "Moved item"
        );
        Ok((item, other))
    }

    /// Renumber every to-buy partition to `0..n`, keeping relative order,
    /// and clear to-buy state left on history items.
    ///
    /// Returns the number of rows changed. Meant to run once at start-up to
    /// repair rows written without these guarantees.
    pub async fn reindex(&self) -> Result<u64> {
        let (_write, mut tx) = self.begin_write().await?;

        let mut changed = item::normalize_prev_bought(&mut tx).await?;
        for is_important in [true, false] {
            let members = item::list_partition(&mut tx, ListType::ToBuy, is_important).await?;
            for (position, mut member) in members.into_iter().enumerate() {
                let position = position as i64;
                if member.sort_order != position {
                    member.sort_order = position;
                    item::update(&mut tx, &member).await?;
                    changed += 1;
                }
            }
        }

        tx.commit().await?;

        if changed > 0 {
            info!(changed, "Reindexed shopping list");
        }
        Ok(changed)
    }
}

/// Add `amount` to the to-buy item called `name`, or append a new one.
async fn merge_or_insert(
    conn: &mut SqliteConnection,
    name: String,
    amount: i64,
    is_important: bool,
) -> Result<Item> {
    if let Some(mut existing) = item::find_by_name(conn, &name, ListType::ToBuy).await? {
        existing.amount = merged_amount(existing.amount, amount)?;
        item::update(conn, &existing).await?;

        debug!(id = %existing.id, name = %existing.name, amount = existing.amount, "Merged item");
        return Ok(existing);
    }

    // A list that empties out forgets its mode.
    if item::count_list(conn, ListType::ToBuy).await? == 0 {
        settings::set_sort_mode(conn, SortMode::Alphabetical).await?;
    }

    let item = Item {
        id: Uuid::new_v4().to_string(),
        name,
        amount,
        is_important,
        sort_order: item::count_partition(conn, ListType::ToBuy, is_important).await?,
        list_type: ListType::ToBuy,
        current_sort_mode: settings::get_sort_mode(conn).await?,
    };
    item::insert(conn, &item).await?;

    debug!(
        id = %item.id,
        name = %item.name,
        is_important = item.is_important,
        sort_order = item.sort_order,
        "Added item"
    );
    Ok(item)
}
