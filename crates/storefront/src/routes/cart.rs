//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Cart state travels in the `aurelia_cart` cookie: each request restores the
//! cart from the cookie, applies the operation, and answers with the updated
//! fragment plus a `Set-Cookie` header.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aurelia_core::ProductId;

use crate::cart::{
    Cart, CartLineView, CookieStorage, EMPTY_CART_MESSAGE, PageSurface, StorageError,
};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// HTMX event fired after every cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

const HX_TRIGGER: &str = "hx-trigger";

/// Cart row display data for templates.
#[derive(Clone)]
pub struct CartRowView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub price_label: String,
}

impl From<&CartLineView> for CartRowView {
    fn from(line: &CartLineView) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            price_label: line.price_label(),
        }
    }
}

/// Cart panel display data for templates.
///
/// Built from what the cart drew onto its [`PageSurface`].
#[derive(Clone)]
pub struct CartPanel {
    /// Panel markup is present on the page.
    pub mounted: bool,
    /// Panel and overlay are visible.
    pub open: bool,
    /// Controls carry their HTMX bindings.
    pub interactive: bool,
    /// The line-items container was rendered.
    pub has_items: bool,
    pub rows: Vec<CartRowView>,
    pub is_empty: bool,
    pub empty_message: &'static str,
    pub total: String,
    pub badge_count: u32,
    pub badge_visible: bool,
    pub badge_ids: Vec<&'static str>,
    pub checkout_url: String,
}

impl CartPanel {
    /// Collect the surface's state for rendering.
    #[must_use]
    pub fn from_surface(surface: &PageSurface, checkout_url: &str) -> Self {
        let items = surface.items();
        let badge = surface.badge().unwrap_or_default();
        Self {
            mounted: surface.is_mounted(),
            open: surface.panel().is_open(),
            interactive: surface.controls().is_some(),
            has_items: items.is_some(),
            rows: items
                .map(|view| view.lines.iter().map(CartRowView::from).collect())
                .unwrap_or_default(),
            is_empty: items.is_some_and(|view| view.is_empty),
            empty_message: EMPTY_CART_MESSAGE,
            total: surface.total().unwrap_or_default().to_string(),
            badge_count: badge.count,
            badge_visible: badge.is_visible(),
            badge_ids: surface.badge_ids().to_vec(),
            checkout_url: checkout_url.to_string(),
        }
    }
}

/// Restore the visitor's cart from the request cookies.
pub fn load_cart<'a>(
    state: &'a AppState,
    headers: &HeaderMap,
) -> Cart<'a, CookieStorage, PageSurface> {
    let storage = CookieStorage::from_headers(headers, state.config().is_secure());
    Cart::load(state.catalog(), storage, PageSurface::full_page())
}

/// Cart panel for a full page render.
///
/// Loading never writes storage, so pages need no `Set-Cookie`.
pub fn page_panel(state: &AppState, headers: &HeaderMap) -> CartPanel {
    let (_, surface) = load_cart(state, headers).into_parts();
    CartPanel::from_surface(&surface, &state.config().checkout_url)
}

/// Finish a cart request: panel data plus response headers for any writes.
fn finish(
    state: &AppState,
    cart: Cart<'_, CookieStorage, PageSurface>,
    mutated: bool,
) -> std::result::Result<(HeaderMap, CartPanel), StorageError> {
    let (storage, surface) = cart.into_parts();
    let mut headers = HeaderMap::new();
    for value in storage.set_cookie_headers()? {
        headers.append(header::SET_COOKIE, value);
    }
    if mutated {
        headers.insert(HX_TRIGGER, HeaderValue::from_static(CART_UPDATED_EVENT));
    }
    let panel = CartPanel::from_surface(&surface, &state.config().checkout_url);
    Ok((headers, panel))
}

/// Add / remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: String,
}

impl CartItemForm {
    fn product_id(&self) -> Result<ProductId> {
        self.product_id
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid product id {:?}", self.product_id)))
    }
}

/// Cart panel fragment template (for HTMX).
///
/// Also refreshes every badge out of band.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel_fragment.html")]
pub struct CartPanelTemplate {
    pub cart: CartPanel,
}

/// Cart items fragment template (for HTMX).
///
/// Swaps the items container and refreshes total and badges out of band,
/// leaving the panel's visibility alone.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items_fragment.html")]
pub struct CartItemsTemplate {
    pub cart: CartPanel,
}

/// Cart badges fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_badges_oob.html")]
pub struct CartBadgesTemplate {
    pub cart: CartPanel,
}

/// Render the cart panel in its initial (closed) state.
#[instrument(skip(state, headers))]
pub async fn panel(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let cart = load_cart(&state, &headers);
    let (headers, cart) = finish(&state, cart, false)?;
    Ok((headers, CartPanelTemplate { cart }).into_response())
}

/// Open the cart panel (HTMX).
#[instrument(skip(state, headers))]
pub async fn open(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let mut cart = load_cart(&state, &headers);
    cart.open();
    let (headers, cart) = finish(&state, cart, false)?;
    Ok((headers, CartPanelTemplate { cart }).into_response())
}

/// Close the cart panel (HTMX).
#[instrument(skip(state, headers))]
pub async fn close(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let mut cart = load_cart(&state, &headers);
    cart.close();
    let (headers, cart) = finish(&state, cart, false)?;
    Ok((headers, CartPanelTemplate { cart }).into_response())
}

/// Add item to cart (HTMX).
///
/// Returns the open panel and a trigger so other elements can refresh.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let product_id = form.product_id()?;
    if state.catalog().get(product_id).is_none() {
        tracing::warn!(%product_id, "Adding product that is not in the catalog");
    }

    let mut cart = load_cart(&state, &headers);
    cart.add(product_id);
    add_breadcrumb(
        "cart",
        "Added product to cart",
        Some(&[("product_id", &product_id.to_string())]),
    );

    let (headers, cart) = finish(&state, cart, true)?;
    Ok((headers, CartPanelTemplate { cart }).into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let product_id = form.product_id()?;

    let mut cart = load_cart(&state, &headers);
    cart.remove(product_id);
    add_breadcrumb(
        "cart",
        "Removed product from cart",
        Some(&[("product_id", &product_id.to_string())]),
    );

    let (headers, cart) = finish(&state, cart, true)?;
    Ok((headers, CartItemsTemplate { cart }).into_response())
}

/// Get cart count badges (HTMX).
#[instrument(skip(state, headers))]
pub async fn count(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let cart = load_cart(&state, &headers);
    let (headers, cart) = finish(&state, cart, false)?;
    Ok((headers, CartBadgesTemplate { cart }).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{MemoryStorage, SurfaceTargets};
    use crate::catalog::Catalog;

    #[test]
    fn test_panel_reflects_surface() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), PageSurface::full_page());
        cart.add(ProductId::new(2));

        let panel = CartPanel::from_surface(cart.surface(), "/checkout");
        assert!(panel.mounted && panel.open && panel.interactive);
        assert_eq!(panel.rows.len(), 1);
        assert_eq!(panel.rows[0].price_label, "$3,400 x 1");
        assert_eq!(panel.total, "$3,400");
        assert_eq!(panel.badge_count, 1);
        assert_eq!(panel.badge_ids, vec!["cart-badge-header", "cart-badge-mobile"]);
    }

    #[test]
    fn test_panel_for_bare_surface() {
        let catalog = Catalog::builtin();
        let cart = Cart::load(
            &catalog,
            MemoryStorage::new(),
            PageSurface::with_targets(SurfaceTargets::NONE),
        );

        let panel = CartPanel::from_surface(cart.surface(), "/checkout");
        assert!(!panel.mounted);
        assert!(!panel.has_items);
        assert!(!panel.badge_visible);
        assert!(panel.badge_ids.is_empty());
        assert!(panel.total.is_empty());
    }

    #[test]
    fn test_form_product_id() {
        let form = CartItemForm {
            product_id: " 4 ".to_string(),
        };
        assert!(matches!(form.product_id(), Ok(id) if id == ProductId::new(4)));

        let form = CartItemForm {
            product_id: "lamp".to_string(),
        };
        assert!(matches!(form.product_id(), Err(AppError::BadRequest(_))));
    }
}
