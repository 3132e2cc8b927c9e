//! Read-only product catalog.
//!
//! The catalog is built once at startup, either from the built-in Aurelia
//! collection or from a JSON file (`AURELIA_CATALOG_PATH`), and never mutated
//! afterwards. The cart only performs point lookups by id.

use std::collections::HashSet;
use std::path::Path;

use aurelia_core::{Price, Product, ProductId};
use thiserror::Error;

/// Pseudo-category that disables the shop filter.
pub const ALL_CATEGORIES: &str = "All";

/// Message shown when a category has no products.
pub const NO_PRODUCTS_MESSAGE: &str = "No products found in this category.";

/// Errors that can occur while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("Product id must be positive (got {0})")]
    InvalidId(ProductId),
}

/// Immutable list of purchasable products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate or non-positive ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` or `CatalogError::InvalidId`.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.as_i64() <= 0 {
                return Err(CatalogError::InvalidId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or a validation error.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            "Loaded catalog from file"
        );
        Ok(catalog)
    }

    /// The built-in Aurelia furniture collection.
    #[must_use]
    pub fn builtin() -> Self {
        let products = vec![
            product(
                1,
                "Lune Chair",
                1250,
                "images/chair-1.svg",
                "The Lune Chair features a sculptural silhouette wrapped in premium boucle fabric. Its organic curves provide exceptional comfort while making a bold artistic statement in any living space. Handcrafted with a solid wood frame.",
                "Seating",
            ),
            product(
                2,
                "Onyx Table",
                3400,
                "images/table-1.svg",
                "Carved from a single block of Nero Marquina marble, the Onyx Table is a study in monolithic beauty. Finished with brushed brass detailing, it serves as a commanding centerpiece for the modern lounge.",
                "Tables",
            ),
            product(
                3,
                "The Sovereign Sofa",
                5800,
                "images/hero-sofa.svg",
                "Our flagship seating piece, the Sovereign Sofa, combines deep-buttoned velvet upholstery with a kiln-dried hardwood frame. It offers an unparalleled seating experience, designed to age gracefully over decades.",
                "Seating",
            ),
            product(
                4,
                "Ethereal Lounge",
                2100,
                "images/chair-1.svg",
                "A perfect blend of form and function, the Ethereal Lounge chair offers a floating sensation with its ergonomic design. Upholstered in Italian leather or custom fabric options.",
                "Seating",
            ),
            product(
                5,
                "Obsidian Console",
                4200,
                "images/table-1.svg",
                "Sleek, dark, and mysterious. The Obsidian Console features a high-gloss lacquer finish and geometric legs, perfect for entryways or as a media unit in a minimalist home.",
                "Tables",
            ),
            product(
                6,
                "Velvet Sectional",
                7500,
                "images/hero-sofa.svg",
                "Modular luxury. The Velvet Sectional allows for endless configurations. Featuring down-filled cushions and stain-resistant velvet for everyday elegance.",
                "Seating",
            ),
        ];
        Self { products }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products in `category`, or every product for [`ALL_CATEGORIES`].
    #[must_use]
    pub fn filter(&self, category: &str) -> Vec<&Product> {
        if category == ALL_CATEGORIES {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn product(
    id: i64,
    name: &str,
    price: u64,
    image: &str,
    description: &str,
    category: &str,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price: Price::new(price),
        image: image.to_string(),
    }
}
