//! Integration tests for the storefront cart fragments.
//!
//! Each request rebuilds the cart from the `aurelia_cart` cookie, so these
//! tests thread the cookie from one response into the next request.

use aurelia_integration_tests::{TestApp, cart_cookie};
use axum::http::StatusCode;
use serde_json::json;

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_sets_cookie_and_opens_panel() {
    let app = TestApp::new();

    let resp = app.post_form("/cart/add", "product_id=1", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.cart_json(), Some(json!([{"id": 1, "qty": 1}])));
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("cart-sidebar open"));
    assert!(resp.body.contains("cart-overlay-bg open"));
    assert!(resp.body.contains("Lune Chair"));
    assert!(resp.body.contains("$1,250 x 1"));
    assert!(resp.body.contains(r#"<span id="cart-total-price">$1,250</span>"#));
}

#[tokio::test]
async fn test_add_accumulates_across_requests() {
    let app = TestApp::new();

    let first = app.post_form("/cart/add", "product_id=1", None).await;
    let cookie = first.cart_cookie().expect("cart cookie");
    let second = app
        .post_form("/cart/add", "product_id=1", Some(&cookie))
        .await;
    let cookie = second.cart_cookie().expect("cart cookie");
    let third = app
        .post_form("/cart/add", "product_id=2", Some(&cookie))
        .await;

    assert_eq!(
        third.cart_json(),
        Some(json!([{"id": 1, "qty": 2}, {"id": 2, "qty": 1}]))
    );
    assert!(third.body.contains("$1,250 x 2"));
    assert!(third.body.contains("$3,400 x 1"));
    assert!(third.body.contains("$5,900"));
    // Both badges refresh out of band with the summed quantity
    assert!(third.body.contains(r#"id="cart-badge-header" class="cart-badge" hx-swap-oob="true">3</span>"#));
    assert!(third.body.contains(r#"id="cart-badge-mobile" class="cart-badge" hx-swap-oob="true">3</span>"#));
}

#[tokio::test]
async fn test_add_unknown_product_is_stored_but_not_rendered() {
    let app = TestApp::new();

    let resp = app.post_form("/cart/add", "product_id=99", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.cart_json(), Some(json!([{"id": 99, "qty": 1}])));
    assert!(!resp.body.contains("cart-item-title"));
    assert!(!resp.body.contains("Your cart is empty."));
    assert!(resp.body.contains(r#"<span id="cart-total-price">$0</span>"#));
    assert!(resp.body.contains(r#"hx-swap-oob="true">1</span>"#));
}

#[tokio::test]
async fn test_add_rejects_malformed_product_id() {
    let app = TestApp::new();

    let resp = app.post_form("/cart/add", "product_id=chair", None).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.cart_cookie().is_none());
}

// =============================================================================
// Remove
// =============================================================================

#[tokio::test]
async fn test_remove_returns_items_fragment_only() {
    let app = TestApp::new();
    let cookie = cart_cookie(r#"[{"id":1,"qty":2},{"id":2,"qty":1}]"#);

    let resp = app
        .post_form("/cart/remove", "product_id=1", Some(&cookie))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.cart_json(), Some(json!([{"id": 2, "qty": 1}])));
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains(r#"id="cart-items""#));
    assert!(!resp.body.contains("Lune Chair"));
    assert!(resp.body.contains("Onyx Table"));
    // Panel visibility is not part of the fragment
    assert!(!resp.body.contains("cart-sidebar"));
    assert!(resp.body.contains(r#"<span id="cart-total-price" hx-swap-oob="true">$3,400</span>"#));
}

#[tokio::test]
async fn test_remove_last_line_shows_empty_cart() {
    let app = TestApp::new();
    let cookie = cart_cookie(r#"[{"id":4,"qty":1}]"#);

    let resp = app
        .post_form("/cart/remove", "product_id=4", Some(&cookie))
        .await;

    assert_eq!(resp.cart_json(), Some(json!([])));
    assert!(resp.body.contains("Your cart is empty."));
    assert!(resp.body.contains("$0"));
    assert!(resp.body.contains("cart-badge is-hidden"));
}

#[tokio::test]
async fn test_remove_absent_product_still_persists() {
    let app = TestApp::new();
    let cookie = cart_cookie(r#"[{"id":1,"qty":1}]"#);

    let resp = app
        .post_form("/cart/remove", "product_id=5", Some(&cookie))
        .await;

    assert_eq!(resp.cart_json(), Some(json!([{"id": 1, "qty": 1}])));
    assert!(resp.body.contains("Lune Chair"));
}

// =============================================================================
// Panel and badges
// =============================================================================

#[tokio::test]
async fn test_panel_starts_closed_and_does_not_write() {
    let app = TestApp::new();
    let cookie = cart_cookie(r#"[{"id":3,"qty":1}]"#);

    let resp = app.get("/cart", Some(&cookie)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains(r#"class="cart-sidebar""#));
    assert!(!resp.body.contains("cart-sidebar open"));
    assert!(resp.body.contains("The Sovereign Sofa"));
    assert!(resp.cart_cookie().is_none());
}

#[tokio::test]
async fn test_open_and_close() {
    let app = TestApp::new();

    let opened = app.post_form("/cart/open", "", None).await;
    assert!(opened.body.contains("cart-sidebar open"));
    assert!(opened.body.contains("Your cart is empty."));
    assert!(opened.cart_cookie().is_none());
    assert!(opened.header("hx-trigger").is_none());

    let closed = app.post_form("/cart/close", "", None).await;
    assert!(!closed.body.contains("cart-sidebar open"));
    assert!(!closed.body.contains("cart-overlay-bg open"));
}

#[tokio::test]
async fn test_unknown_products_are_skipped_but_counted() {
    let app = TestApp::new();
    let cookie = cart_cookie(r#"[{"id":1,"qty":2},{"id":99,"qty":1}]"#);

    let resp = app.get("/cart", Some(&cookie)).await;

    assert!(resp.body.contains("$1,250 x 2"));
    assert!(resp.body.contains(r#"<span id="cart-total-price">$2,500</span>"#));
    assert!(resp.body.contains(r#"hx-swap-oob="true">3</span>"#));
}

#[tokio::test]
async fn test_malformed_cookie_yields_empty_cart() {
    let app = TestApp::new();

    let resp = app.get("/cart", Some("aurelia_cart=not-json")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty."));
    assert!(resp.body.contains(r#"<span id="cart-total-price">$0</span>"#));
}

#[tokio::test]
async fn test_duplicate_lines_in_cookie_start_a_fresh_cart() {
    let app = TestApp::new();
    let cookie = cart_cookie(r#"[{"id":1,"qty":1},{"id":1,"qty":2}]"#);

    let page = app.get("/cart", Some(&cookie)).await;
    assert!(page.body.contains("Your cart is empty."));

    let resp = app
        .post_form("/cart/add", "product_id=1", Some(&cookie))
        .await;
    assert_eq!(resp.cart_json(), Some(json!([{"id": 1, "qty": 1}])));
}

#[tokio::test]
async fn test_count_fragment() {
    let app = TestApp::new();
    let cookie = cart_cookie(r#"[{"id":1,"qty":2},{"id":6,"qty":3}]"#);

    let resp = app.get("/cart/count", Some(&cookie)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.matches(">5</span>").count(), 2);
    assert!(!resp.body.contains("cart-sidebar"));
}
