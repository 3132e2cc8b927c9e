//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /shop?category=<c>      - Product grid, filtered by category
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel (closed)
//! POST /cart/open              - Open the panel
//! POST /cart/close             - Close the panel
//! POST /cart/add               - Add to cart (returns open panel, triggers cart-updated)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badges (fragment)
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::error::AppError;
use crate::middleware::cart_rate_limiter;
use crate::state::AppState;

/// Create the cart read routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::panel))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/count", get(cart::count))
}

/// Create the cart mutation routes router.
///
/// These rewrite the cart cookie and are the ones worth rate limiting.
pub fn cart_mutation_routes(rate_limited: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove));

    if !rate_limited {
        return router;
    }
    match cart_rate_limiter() {
        Some(limiter) => router.layer(limiter),
        None => {
            tracing::warn!("Cart rate limiter configuration rejected, serving unlimited");
            router
        }
    }
}

/// Create all routes for the storefront.
pub fn routes(rate_limited: bool) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/shop", get(home::shop))
        // Product routes
        .route("/products/{id}", get(products::show))
        // Cart routes
        .nest(
            "/cart",
            cart_routes().merge(cart_mutation_routes(rate_limited)),
        )
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}
