//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A purchasable product.
///
/// Products are read-only once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier within the catalog.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Display category used by the shop filter (e.g., "Seating").
    pub category: String,
    pub price: Price,
    /// Path to the display image, relative to the site root.
    pub image: String,
}

impl Product {
    /// Document title used on the product detail page.
    #[must_use]
    pub fn page_title(&self) -> String {
        format!("{} | AURELIA", self.name)
    }
}
