//! Catalog listing.

use aurelia_storefront::catalog::{ALL_CATEGORIES, Catalog, NO_PRODUCTS_MESSAGE};

/// List products, one per line, optionally filtered to a category.
pub fn list(catalog: &Catalog, category: Option<&str>) -> String {
    let products = catalog.filter(category.unwrap_or(ALL_CATEGORIES));
    if products.is_empty() {
        return format!("{NO_PRODUCTS_MESSAGE}\n");
    }

    products
        .iter()
        .map(|product| {
            format!(
                "{:>4}  {:<22} {:<10} {:>8}\n",
                product.id.as_i64(),
                product.name,
                product.category,
                product.price.to_string(),
            )
        })
        .collect()
}
