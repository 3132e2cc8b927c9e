//! Home and shop page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use super::cart::{CartPanel, page_panel};
use super::products::ProductCardView;
use crate::catalog::{ALL_CATEGORIES, NO_PRODUCTS_MESSAGE};
use crate::filters;
use crate::state::AppState;

/// Products featured on the home page.
const FEATURED_PRODUCTS: usize = 3;

/// Shop filter button display data.
#[derive(Clone)]
pub struct CategoryFilterView {
    pub name: String,
    pub active: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub featured: Vec<ProductCardView>,
    pub cart: CartPanel,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub title: String,
    pub categories: Vec<CategoryFilterView>,
    pub products: Vec<ProductCardView>,
    pub empty_message: &'static str,
    pub cart: CartPanel,
}

/// Shop query parameters.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

/// Display the home page.
#[instrument(skip(state, headers))]
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let featured = ProductCardView::grid(
        state
            .catalog()
            .products()
            .iter()
            .take(FEATURED_PRODUCTS),
    );

    HomeTemplate {
        title: "AURELIA | Modern Luxury Furniture".to_string(),
        featured,
        cart: page_panel(&state, &headers),
    }
}

/// Display the shop grid, optionally filtered to one category.
#[instrument(skip(state, headers))]
pub async fn shop(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let active = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(ALL_CATEGORIES);

    let catalog = state.catalog();
    let categories = std::iter::once(ALL_CATEGORIES)
        .chain(catalog.categories())
        .map(|name| CategoryFilterView {
            name: name.to_string(),
            active: name == active,
        })
        .collect();

    ShopTemplate {
        title: "Shop | AURELIA".to_string(),
        categories,
        products: ProductCardView::grid(catalog.filter(active)),
        empty_message: NO_PRODUCTS_MESSAGE,
        cart: page_panel(&state, &headers),
    }
}
