//! Shopping list routes.
//!
//! Thin wrappers that map each endpoint onto one [`ShoppingList`] operation.
//! Item ids are opaque; an id that matches nothing is a 404.
//!
//! [`ShoppingList`]: shopping_list::ShoppingList

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use shopping_list::{Direction, Item, NewItem, ShoppingListError, SortMode};

use crate::error::Result;
use crate::state::AppState;

/// Build the `/ShoppingList` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ToBuy", get(to_buy))
        .route("/PrevBought", get(prev_bought))
        .route("/AddItemToBuy", post(add_item_to_buy))
        .route("/DeleteItem/:id", delete(delete_item))
        .route("/ToggleItemImportance/:id", post(toggle_item_importance))
        .route("/MoveItemToPrevBought/:id", post(move_item_to_prev_bought))
        .route("/AddItemFromPrevBought/:id", post(add_item_from_prev_bought))
        .route("/ChangeSortMode/:mode", post(change_sort_mode))
        .route("/MoveItem/:id/:direction", post(move_item))
}

/// Query parameters for the to-buy list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToBuyParams {
    /// Presentation order for this read only.
    pub sort_mode: Option<String>,
}

fn parse_sort_mode(value: &str) -> Result<SortMode> {
    Ok(value.parse::<SortMode>().map_err(ShoppingListError::from)?)
}

/// List the to-buy items.
pub async fn to_buy(
    State(state): State<AppState>,
    Query(params): Query<ToBuyParams>,
) -> Result<Json<Vec<Item>>> {
    let sort_mode = params.sort_mode.as_deref().map(parse_sort_mode).transpose()?;
    let items = state.list.to_buy(sort_mode).await?;
    Ok(Json(items))
}

/// List the previously bought items.
pub async fn prev_bought(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    let items = state.list.prev_bought().await?;
    Ok(Json(items))
}

/// Add or merge an item into the to-buy list.
pub async fn add_item_to_buy(
    State(state): State<AppState>,
    Json(new): Json<NewItem>,
) -> Result<Json<Item>> {
    let item = state.list.add_to_buy(new).await?;
    Ok(Json(item))
}

/// Delete an item from either list.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let item = state.list.delete_item(&id).await?;
    Ok(Json(item))
}

/// Flip an item's importance.
pub async fn toggle_item_importance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let item = state.list.toggle_importance(&id).await?;
    Ok(Json(item))
}

/// Move an item to the history.
pub async fn move_item_to_prev_bought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let item = state.list.move_to_prev_bought(&id).await?;
    Ok(Json(item))
}

/// Re-add a history item to the to-buy list.
pub async fn add_item_from_prev_bought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let item = state.list.add_from_prev_bought(&id).await?;
    Ok(Json(item))
}

/// Change the sort mode of the whole to-buy list.
pub async fn change_sort_mode(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<Json<Vec<Item>>> {
    let mode = parse_sort_mode(&mode)?;
    let items = state.list.change_sort_mode(mode).await?;
    Ok(Json(items))
}

/// Swap an item with its neighbour. Responds with `[moved, swapped]`.
pub async fn move_item(
    State(state): State<AppState>,
    Path((id, direction)): Path<(String, i64)>,
) -> Result<Json<(Item, Item)>> {
    let direction = Direction::try_from(direction)?;
    let pair = state.list.move_item(&id, direction).await?;
    Ok(Json(pair))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use shopping_list::Database;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    async fn app() -> Router {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        crate::routes::router().with_state(AppState::new(&db))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn add(app: &Router, name: &str, important: bool) -> Value {
        let (status, item) = send(
            app,
            "POST",
            "/api/ShoppingList/AddItemToBuy",
            Some(serde_json::json!({ "name": name, "amount": 1, "isImportant": important })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        item
    }

    fn names(list: &Value) -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["items"]["toBuy"], 0);

        add(&app, "Milk", false).await;
        let (_, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(body["items"]["toBuy"], 1);
        assert_eq!(body["items"]["prevBought"], 0);
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let app = app().await;
        let milk = add(&app, "Milk", false).await;
        assert_eq!(milk["sortOrder"], 0);
        assert_eq!(milk["listType"], "ToBuy");
        assert_eq!(milk["currentSortMode"], "Alphabetical");
        add(&app, "Apples", false).await;
        add(&app, "Tea", true).await;

        let (status, list) = send(&app, "GET", "/api/ShoppingList/ToBuy", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Tea", "Apples", "Milk"]);

        let (_, list) = send(&app, "GET", "/api/ShoppingList/ToBuy?sortMode=Custom", None).await;
        assert_eq!(names(&list), vec!["Tea", "Milk", "Apples"]);

        let (status, _) = send(&app, "GET", "/api/ShoppingList/ToBuy?sortMode=Shuffled", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_rejects_empty_name() {
        let app = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/ShoppingList/AddItemToBuy",
            Some(serde_json::json!({ "name": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_history_round_trip() {
        let app = app().await;
        let eggs = add(&app, "Eggs", true).await;
        let id = eggs["id"].as_str().unwrap();

        let uri = format!("/api/ShoppingList/MoveItemToPrevBought/{id}");
        let (status, moved) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["listType"], "PrevBought");
        assert_eq!(moved["sortOrder"], -1);
        assert_eq!(moved["isImportant"], false);

        let (_, history) = send(&app, "GET", "/api/ShoppingList/PrevBought", None).await;
        assert_eq!(names(&history), vec!["Eggs"]);

        let uri = format!("/api/ShoppingList/AddItemFromPrevBought/{id}");
        let (status, readded) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(readded["amount"], 1);
        assert_eq!(readded["isImportant"], false);
        assert_ne!(readded["id"], eggs["id"]);
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let app = app().await;
        let milk = add(&app, "Milk", false).await;
        let id = milk["id"].as_str().unwrap();

        let uri = format!("/api/ShoppingList/ToggleItemImportance/{id}");
        let (status, toggled) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["isImportant"], true);

        let uri = format!("/api/ShoppingList/DeleteItem/{id}");
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let app = app().await;
        let uri = format!("/api/ShoppingList/ToggleItemImportance/{}", Uuid::new_v4());
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let app = app().await;
        add(&app, "Milk", false).await;

        for (method, uri) in [
            ("DELETE", "/api/ShoppingList/DeleteItem/not-a-guid"),
            ("POST", "/api/ShoppingList/ToggleItemImportance/not-a-guid"),
            ("POST", "/api/ShoppingList/MoveItemToPrevBought/not-a-guid"),
            ("POST", "/api/ShoppingList/AddItemFromPrevBought/not-a-guid"),
            ("POST", "/api/ShoppingList/MoveItem/not-a-guid/1"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert!(body["error"].as_str().unwrap().contains("not-a-guid"));
        }

        let (_, list) = send(&app, "GET", "/api/ShoppingList/ToBuy", None).await;
        assert_eq!(names(&list), vec!["Milk"]);
    }

    #[tokio::test]
    async fn test_change_sort_mode() {
        let app = app().await;
        add(&app, "Milk", false).await;
        add(&app, "Apples", false).await;

        let (status, list) = send(&app, "POST", "/api/ShoppingList/ChangeSortMode/Custom", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Milk", "Apples"]);
        assert!(list
            .as_array()
            .unwrap()
            .iter()
            .all(|i| i["currentSortMode"] == "Custom"));

        let (status, list) = send(&app, "POST", "/api/ShoppingList/ChangeSortMode/0", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Apples", "Milk"]);

        let (status, _) = send(&app, "POST", "/api/ShoppingList/ChangeSortMode/Random", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_move_item() {
        let app = app().await;
        let a = add(&app, "A", false).await;
        let b = add(&app, "B", false).await;
        let a_id = a["id"].as_str().unwrap();

        let uri = format!("/api/ShoppingList/MoveItem/{a_id}/1");
        let (status, pair) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pair[0]["id"], a["id"]);
        assert_eq!(pair[0]["sortOrder"], 1);
        assert_eq!(pair[1]["id"], b["id"]);
        assert_eq!(pair[1]["sortOrder"], 0);
        assert_eq!(pair[0]["currentSortMode"], "Custom");

        // Already last
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/api/ShoppingList/MoveItem/{a_id}/2");
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
