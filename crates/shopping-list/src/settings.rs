//! List-level settings.
//!
//! The to-buy list's sort mode lives in a single `list_settings` row and is
//! joined onto every to-buy item when items are read.

use sqlx::SqliteConnection;

use crate::models::SortMode;
use crate::Result;

/// Get the stored sort mode of the to-buy list.
pub(crate) async fn get_sort_mode(conn: &mut SqliteConnection) -> Result<SortMode> {
    let mode = sqlx::query_scalar::<_, SortMode>(
        r#"
        SELECT sort_mode
        FROM list_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(mode.unwrap_or_default())
}

/// Store the sort mode of the to-buy list.
pub(crate) async fn set_sort_mode(conn: &mut SqliteConnection, mode: SortMode) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO list_settings (id, sort_mode)
        VALUES (1, ?)
        ON CONFLICT(id) DO UPDATE SET
            sort_mode = excluded.sort_mode,
            updated_at = datetime('now')
        "#,
    )
    .bind(mode)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
