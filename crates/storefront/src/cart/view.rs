//! Declarative cart view-model.
//!
//! [`CartView`] is the projection of cart state joined against the catalog.
//! Rendering adapters (askama templates, the CLI text renderer) consume it;
//! nothing here knows about markup.

use aurelia_core::{Price, ProductId};

use super::line::CartLine;
use crate::catalog::Catalog;

/// Text shown in place of rows when the cart holds no lines.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// One displayable cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Tag for the remove affordance.
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl CartLineView {
    /// Price caption, e.g. `$1,250 x 2`.
    #[must_use]
    pub fn price_label(&self) -> String {
        format!("{} x {}", self.unit_price, self.quantity)
    }
}

/// Rows plus running total for the whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: Price,
    /// True only when the cart holds no lines at all. A cart whose lines all
    /// reference unknown products renders no rows and no message.
    pub is_empty: bool,
}

impl CartView {
    /// Project cart lines through the catalog.
    ///
    /// Lines whose product is not in the catalog are skipped and do not count
    /// toward the total.
    #[must_use]
    pub fn project(lines: &[CartLine], catalog: &Catalog) -> Self {
        let rows: Vec<CartLineView> = lines
            .iter()
            .filter_map(|line| {
                let Some(product) = catalog.get(line.id) else {
                    tracing::debug!(product_id = %line.id, "Skipping cart line for unknown product");
                    return None;
                };
                let quantity = line.quantity.get();
                Some(CartLineView {
                    product_id: product.id,
                    name: product.name.clone(),
                    image: product.image.clone(),
                    unit_price: product.price,
                    quantity,
                    line_total: product.price * quantity,
                })
            })
            .collect();

        let total = rows.iter().map(|row| row.line_total).sum();

        Self {
            lines: rows,
            total,
            is_empty: lines.is_empty(),
        }
    }

    /// Formatted grand total, `$0` for an empty cart.
    #[must_use]
    pub fn total_display(&self) -> String {
        self.total.to_string()
    }

    /// Empty-state message, if it should be shown.
    #[must_use]
    pub const fn empty_message(&self) -> Option<&'static str> {
        if self.is_empty {
            Some(EMPTY_CART_MESSAGE)
        } else {
            None
        }
    }
}

/// Quantity indicator state shared by every badge on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BadgeView {
    /// Sum of all line quantities, including lines for unknown products.
    pub count: u32,
}

impl BadgeView {
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let count = lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity.get()));
        Self { count }
    }

    /// Badges are hidden while the cart is empty.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.count > 0
    }
}
