//! Integration tests for the customer carts API.
//!
//! Each test drives the admin router in process against an in-memory
//! backend; no platform credentials are needed.

#![allow(clippy::indexing_slicing)]

use axum::http::StatusCode;
use cart_manager_integration_tests::{TestApp, cart};
use serde_json::{Value, json};

const CARTS: &str = "/customers/cust-1/carts";

fn app() -> TestApp {
    TestApp::new(vec![
        cart("a", "cust-1", &[2, 3, 0], 123_456),
        cart("b", "cust-1", &[1], 999),
        cart("c", "cust-1", &[], 0),
        cart("d", "cust-2", &[4], 500),
    ])
}

fn row_ids(view: &Value) -> Vec<&str> {
    view["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|row| row["id"].as_str().expect("row id"))
        .collect()
}

async fn select(app: &TestApp, body: Value) -> Value {
    let (status, view) = app.post(&format!("{CARTS}/selection"), body).await;
    assert_eq!(status, StatusCode::OK);
    view
}

#[tokio::test]
async fn test_health() {
    let (status, body) = app().get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_list_carts_for_customer() {
    let app = app();
    let (status, view) = app.get(CARTS).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_ids(&view), ["a", "b", "c"]);
    assert_eq!(view["title"], "Cart list");
    assert_eq!(view["headerCheckbox"], "unchecked");
    assert_eq!(view["selectedCount"], 0);

    let columns: Vec<&str> = view["columns"]
        .as_array()
        .expect("columns")
        .iter()
        .map(|c| c["key"].as_str().expect("key"))
        .collect();
    assert_eq!(columns, ["id", "count", "totalPrice", "billingAddress"]);

    let cells = &view["rows"][0]["cells"];
    assert_eq!(cells[0], json!({"column": "id", "value": "a"}));
    assert_eq!(cells[1]["value"], "5");
    assert_eq!(cells[2]["value"], "€1,234.56");
    assert_eq!(cells[3]["value"], ",  , Berlin, ");
}

#[tokio::test]
async fn test_customer_without_carts_shows_empty_state() {
    let app = app();
    let (status, view) = app.get("/customers/nobody/carts").await;

    assert_eq!(status, StatusCode::OK);
    assert!(row_ids(&view).is_empty());
    assert_eq!(
        view["emptyMessage"],
        "There are no Carts available for this user"
    );
}

#[tokio::test]
async fn test_selection_actions() {
    let app = app();
    app.get(CARTS).await;

    let view = select(&app, json!({"action": "toggleRow", "id": "b"})).await;
    assert_eq!(view["selectedCount"], 1);
    assert_eq!(view["headerCheckbox"], "indeterminate");
    assert_eq!(view["rows"][1]["isSelected"], true);

    let view = select(&app, json!({"action": "toggleRow", "id": "missing"})).await;
    assert_eq!(view["selectedCount"], 1);

    let view = select(&app, json!({"action": "selectAll"})).await;
    assert_eq!(view["headerCheckbox"], "checked");
    assert_eq!(view["selectedCount"], 3);

    let view = select(&app, json!({"action": "deselectAll"})).await;
    assert_eq!(view["headerCheckbox"], "unchecked");

    let view = select(&app, json!({"action": "toggleHeader"})).await;
    assert_eq!(view["selectedCount"], 3);
    select(&app, json!({"action": "toggleRow", "id": "a"})).await;
    let view = select(&app, json!({"action": "toggleHeader"})).await;
    assert_eq!(view["selectedCount"], 0);
}

#[tokio::test]
async fn test_unknown_selection_action_is_rejected() {
    let app = app();
    let (status, _) = app
        .post(&format!("{CARTS}/selection"), json!({"action": "invert"}))
        .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_delete_selected_carts() {
    let app = app();
    app.get(CARTS).await;
    select(&app, json!({"action": "toggleRow", "id": "a"})).await;
    select(&app, json!({"action": "toggleRow", "id": "c"})).await;

    let (status, body) = app.post(&format!("{CARTS}/delete"), json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"].as_array().expect("deleted").len(), 2);
    assert_eq!(row_ids(&body["table"]), ["b"]);
    assert_eq!(body["table"]["selectedCount"], 0);
    assert_eq!(app.backend.cart_ids(), ["b", "d"]);
}

#[tokio::test]
async fn test_delete_without_selection_is_bad_request() {
    let app = app();
    app.get(CARTS).await;
    let fetches = app.backend.fetches();

    let (status, _) = app.post(&format!("{CARTS}/delete"), json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.backend.fetches(), fetches);
}

#[tokio::test]
async fn test_partial_delete_failure_still_refreshes() {
    let app = app();
    app.backend.mark_stale("b");
    app.get(CARTS).await;
    select(&app, json!({"action": "selectAll"})).await;
    let fetches = app.backend.fetches();

    let (status, body) = app.post(&format!("{CARTS}/delete"), json!({})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!("1 of 3 cart deletions failed"));
    assert_eq!(app.backend.fetches(), fetches + 1);
    assert_eq!(app.backend.cart_ids(), ["b", "d"]);

    // The surviving cart stays selected.
    let (_, view) = app.get(CARTS).await;
    assert_eq!(row_ids(&view), ["b"]);
    assert_eq!(view["rows"][0]["isSelected"], true);
}

#[tokio::test]
async fn test_fetch_failure_is_bad_gateway() {
    let app = app();
    app.backend.fail_fetches();

    let (status, body) = app.get(CARTS).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!("External service error"));
}

#[tokio::test]
async fn test_open_cart() {
    let app = app();

    // A direct link loads the customer's carts first.
    let (status, detail) = app.get(&format!("{CARTS}/by-id/a")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "Cart details");
    assert_eq!(detail["backLabel"], "Back");
    assert_eq!(detail["cart"]["id"], "a");
    assert_eq!(detail["lineItemCount"], 5);
    assert_eq!(detail["totalPrice"], "€1,234.56");
    assert_eq!(detail["lineItems"][0]["name"], "Item 0");
}

#[tokio::test]
async fn test_open_cart_of_other_customer_is_not_found() {
    let app = app();
    let (status, _) = app.get(&format!("{CARTS}/by-id/d")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sorting_is_recorded_without_reordering() {
    let app = app();
    let (_, view) = app
        .get(&format!("{CARTS}?sortedBy=totalPrice&sortDirection=desc"))
        .await;

    assert_eq!(
        view["sorting"],
        json!({"sortedBy": "totalPrice", "sortDirection": "desc"})
    );
    assert_eq!(row_ids(&view), ["a", "b", "c"]);
}

#[tokio::test]
async fn test_cart_ids_matching_action_names_can_be_opened() {
    let app = TestApp::new(vec![
        cart("delete", "cust-1", &[1], 100),
        cart("selection", "cust-1", &[2], 200),
    ]);

    for id in ["delete", "selection"] {
        let (status, detail) = app.get(&format!("{CARTS}/by-id/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["cart"]["id"], id);
    }
}

#[tokio::test]
async fn test_reload_failure_after_delete_is_reported() {
    let app = app();
    app.get(CARTS).await;
    select(&app, json!({"action": "toggleRow", "id": "a"})).await;
    app.backend.fail_fetches();

    let (status, body) = app.post(&format!("{CARTS}/delete"), json!({})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!("External service error"));
    assert_eq!(app.backend.cart_ids(), ["b", "c", "d"]);

    // The deleted cart left the table, so nothing is selected any more and
    // a second click does not reach the platform.
    let fetches = app.backend.fetches();
    let (status, _) = app.post(&format!("{CARTS}/delete"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.backend.fetches(), fetches);
}
