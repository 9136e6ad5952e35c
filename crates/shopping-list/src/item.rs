//! Row-level item storage.
//!
//! Every function takes a `&mut SqliteConnection` so callers can run several
//! of them inside one transaction. None of them maintain the sort order
//! invariant on their own; that is the job of [`crate::ShoppingList`].

use sqlx::SqliteConnection;

use crate::error::{Result, ShoppingListError};
use crate::models::{Item, ListType, SortMode};

/// Item columns plus the list-wide mode. History items always report
/// alphabetical order.
const SELECT_ITEM: &str = r#"
    SELECT i.id, i.name, i.amount, i.is_important, i.sort_order, i.list_type,
           CASE WHEN i.list_type = 'ToBuy' THEN s.sort_mode ELSE 'Alphabetical' END
               AS current_sort_mode
    FROM items i
    CROSS JOIN list_settings s
    WHERE s.id = 1
"#;

/// Get an item by ID from either list.
pub(crate) async fn get(conn: &mut SqliteConnection, id: &str) -> Result<Option<Item>> {
    let query = format!("{SELECT_ITEM} AND i.id = ?");
    let item = sqlx::query_as::<_, Item>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(item)
}

/// Get an item by ID, only if it is on the given list.
pub(crate) async fn get_in_list(
    conn: &mut SqliteConnection,
    id: &str,
    list: ListType,
) -> Result<Option<Item>> {
    let query = format!("{SELECT_ITEM} AND i.id = ? AND i.list_type = ?");
    let item = sqlx::query_as::<_, Item>(&query)
        .bind(id)
        .bind(list)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(item)
}

/// Find an item on a list by exact (case-sensitive) name.
pub(crate) async fn find_by_name(
    conn: &mut SqliteConnection,
    name: &str,
    list: ListType,
) -> Result<Option<Item>> {
    let query = format!(
        "{SELECT_ITEM} AND i.name = ? AND i.list_type = ? ORDER BY i.created_at, i.id LIMIT 1"
    );
    let item = sqlx::query_as::<_, Item>(&query)
        .bind(name)
        .bind(list)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(item)
}

/// Find the item at a given position of a partition.
pub(crate) async fn find_at(
    conn: &mut SqliteConnection,
    list: ListType,
    is_important: bool,
    sort_order: i64,
) -> Result<Option<Item>> {
    let query = format!(
        "{SELECT_ITEM} AND i.list_type = ? AND i.is_important = ? AND i.sort_order = ? LIMIT 1"
    );
    let item = sqlx::query_as::<_, Item>(&query)
        .bind(list)
        .bind(is_important)
        .bind(sort_order)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(item)
}

/// Count the items of one (list, importance) partition.
pub(crate) async fn count_partition(
    conn: &mut SqliteConnection,
    list: ListType,
    is_important: bool,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM items
        WHERE list_type = ? AND is_important = ?
        "#,
    )
    .bind(list)
    .bind(is_important)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

/// Count all items on a list.
pub(crate) async fn count_list(conn: &mut SqliteConnection, list: ListType) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM items
        WHERE list_type = ?
        "#,
    )
    .bind(list)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

/// Insert a new item.
pub(crate) async fn insert(conn: &mut SqliteConnection, item: &Item) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO items (id, name, amount, is_important, sort_order, list_type)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.name)
    .bind(item.amount)
    .bind(item.is_important)
    .bind(item.sort_order)
    .bind(item.list_type)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Write back every mutable column of an item.
pub(crate) async fn update(conn: &mut SqliteConnection, item: &Item) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE items
        SET name = ?, amount = ?, is_important = ?, sort_order = ?, list_type = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&item.name)
    .bind(item.amount)
    .bind(item.is_important)
    .bind(item.sort_order)
    .bind(item.list_type)
    .bind(&item.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ShoppingListError::item_not_found(&item.id));
    }

    Ok(())
}

/// Delete an item by ID.
pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ShoppingListError::item_not_found(id));
    }

    Ok(())
}

/// Shift every member of `item`'s partition that sits after it up by one
/// position, leaving no hole once `item` leaves the partition.
///
/// Must run before `item` itself is moved or deleted. History items have
/// no positions, so nothing shifts for them.
pub(crate) async fn close_gap(conn: &mut SqliteConnection, item: &Item) -> Result<u64> {
    if item.list_type != ListType::ToBuy {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        UPDATE items
        SET sort_order = sort_order - 1, updated_at = datetime('now')
        WHERE list_type = ? AND is_important = ? AND sort_order > ? AND id != ?
        "#,
    )
    .bind(item.list_type)
    .bind(item.is_important)
    .bind(item.sort_order)
    .bind(&item.id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// List the to-buy items, important first, each group ordered by `mode`.
pub(crate) async fn list_to_buy(conn: &mut SqliteConnection, mode: SortMode) -> Result<Vec<Item>> {
    let order_by = match mode {
        SortMode::Alphabetical => "i.is_important DESC, i.name, i.sort_order, i.id",
        SortMode::Custom => "i.is_important DESC, i.sort_order, i.name, i.id",
    };
    let query = format!("{SELECT_ITEM} AND i.list_type = 'ToBuy' ORDER BY {order_by}");

    let items = sqlx::query_as::<_, Item>(&query)
        .fetch_all(&mut *conn)
        .await?;

    Ok(items)
}

/// List the history, ordered by name.
pub(crate) async fn list_prev_bought(conn: &mut SqliteConnection) -> Result<Vec<Item>> {
    let query = format!("{SELECT_ITEM} AND i.list_type = 'PrevBought' ORDER BY i.name, i.id");

    let items = sqlx::query_as::<_, Item>(&query)
        .fetch_all(&mut *conn)
        .await?;

    Ok(items)
}

/// List one partition in its current position order.
pub(crate) async fn list_partition(
    conn: &mut SqliteConnection,
    list: ListType,
    is_important: bool,
) -> Result<Vec<Item>> {
    let query = format!(
        "{SELECT_ITEM} AND i.list_type = ? AND i.is_important = ? \
         ORDER BY i.sort_order, i.name, i.id"
    );

    let items = sqlx::query_as::<_, Item>(&query)
        .bind(list)
        .bind(is_important)
        .fetch_all(&mut *conn)
        .await?;

    Ok(items)
}

/// Reset history rows that carry to-buy state. Returns the number of rows changed.
pub(crate) async fn normalize_prev_bought(conn: &mut SqliteConnection) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE items
        SET sort_order = -1, is_important = 0, amount = 0, updated_at = datetime('now')
        WHERE list_type = 'PrevBought'
          AND (sort_order != -1 OR is_important != 0 OR amount != 0)
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
