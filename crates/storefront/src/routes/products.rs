//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use aurelia_core::{Product, ProductId};

use super::cart::{CartPanel, page_panel};
use crate::filters;
use crate::state::AppState;

/// Heading shown when a product id does not resolve.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    /// Stagger delay for the card's fade-in, in milliseconds.
    pub delay_ms: u32,
}

impl ProductCardView {
    /// Build cards for a grid, staggering each by 100ms.
    #[must_use]
    pub fn grid<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<Self> {
        products
            .into_iter()
            .zip(1u32..)
            .map(|(product, position)| Self {
                id: product.id.to_string(),
                name: product.name.clone(),
                price: product.price.to_string(),
                image: product.image.clone(),
                delay_ms: position.saturating_mul(100),
            })
            .collect()
    }
}

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub title: String,
    pub product: ProductView,
    pub cart: CartPanel,
}

/// Unknown product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub title: String,
    pub message: &'static str,
    pub cart: CartPanel,
}

/// Display product detail page.
#[instrument(skip(state, headers))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let cart = page_panel(&state, &headers);
    let product = id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| state.catalog().get(id));

    match product {
        Some(product) => ProductShowTemplate {
            title: product.page_title(),
            product: ProductView::from(product),
            cart,
        }
        .into_response(),
        None => {
            tracing::debug!(%id, "Product not found");
            (
                StatusCode::NOT_FOUND,
                ProductNotFoundTemplate {
                    title: format!("{PRODUCT_NOT_FOUND} | AURELIA"),
                    message: PRODUCT_NOT_FOUND,
                    cart,
                },
            )
                .into_response()
        }
    }
}
