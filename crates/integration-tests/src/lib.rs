//! Integration tests for Aurelia.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p aurelia-integration-tests
//! ```
//!
//! The storefront router is driven in-process through
//! `tower::ServiceExt::oneshot`; no listener or browser is involved. Cookies
//! are carried between requests by hand, the way a browser would.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart fragments and cookie persistence
//! - `storefront_pages` - Page rendering, shop filter, product detail

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use tower::ServiceExt;

use aurelia_storefront::{
    app,
    cart::CART_STORAGE_KEY,
    catalog::Catalog,
    config::StorefrontConfig,
    state::AppState,
};

/// Upper bound on response bodies read by tests.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A storefront router plus helpers for issuing requests against it.
pub struct TestApp {
    router: Router,
}

/// The parts of a response tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestApp {
    /// Storefront over the built-in catalog with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::with_catalog(
            StorefrontConfig::default(),
            Catalog::builtin(),
        ))
    }

    /// Storefront over the given state. Rate limiting stays off: oneshot
    /// requests carry no peer address.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            router: app(state, false),
        }
    }

    /// Issue a GET, optionally with a `Cookie` header.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::get(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).expect("valid request"))
            .await
    }

    /// Issue a form-encoded POST, optionally with a `Cookie` header.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(form.to_string())).expect("valid request"))
            .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestResponse {
    /// The `aurelia_cart=<value>` pair from `Set-Cookie`, ready to send back.
    #[must_use]
    pub fn cart_cookie(&self) -> Option<String> {
        let prefix = format!("{CART_STORAGE_KEY}=");
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter(|value| value.starts_with(&prefix))
            .filter_map(|value| value.split(';').next())
            .map(str::to_string)
            .next()
    }

    /// Decoded cart JSON from `Set-Cookie`.
    #[must_use]
    pub fn cart_json(&self) -> Option<serde_json::Value> {
        let pair = self.cart_cookie()?;
        let (_, encoded) = pair.split_once('=')?;
        let decoded = urlencoding::decode(encoded).ok()?;
        serde_json::from_str(&decoded).ok()
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Encode cart JSON as a `Cookie` header value.
#[must_use]
pub fn cart_cookie(json: &str) -> String {
    format!("{CART_STORAGE_KEY}={}", urlencoding::encode(json))
}
