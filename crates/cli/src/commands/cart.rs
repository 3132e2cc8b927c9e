//! File-backed cart commands.
//!
//! The cart lives in `<store>/aurelia_cart.json`, the same JSON the storefront
//! keeps in its cookie, and is drawn with a plain-text surface.

use std::fmt;
use std::path::Path;

use aurelia_storefront::cart::{
    BadgeView, Cart, CartControls, CartSurface, CartView, FileStorage, PanelState,
    SurfaceTargets,
};
use aurelia_storefront::catalog::Catalog;

use crate::CartAction;

/// Plain-text rendering surface: rows, total, and one badge line.
#[derive(Debug, Default)]
pub struct TextSurface {
    items: Option<CartView>,
    total: Option<String>,
    badge: Option<BadgeView>,
}

impl TextSurface {
    const TARGETS: SurfaceTargets = SurfaceTargets {
        panel: false,
        items: true,
        total: true,
        badges: 1,
    };
}

impl CartSurface for TextSurface {
    fn targets(&self) -> SurfaceTargets {
        Self::TARGETS
    }

    fn mount_panel(&mut self) {}

    fn bind_controls(&mut self, _controls: &'static CartControls) {}

    fn show_items(&mut self, view: &CartView) {
        self.items = Some(view.clone());
    }

    fn show_total(&mut self, total: &str) {
        self.total = Some(total.to_string());
    }

    fn show_badges(&mut self, badge: BadgeView) {
        self.badge = Some(badge);
    }

    fn show_panel(&mut self, _state: PanelState) {}
}

impl fmt::Display for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(view) = &self.items {
            if let Some(message) = view.empty_message() {
                writeln!(f, "{message}")?;
            }
            for line in &view.lines {
                writeln!(
                    f,
                    "{:>4}  {:<22} {}",
                    line.product_id.as_i64(),
                    line.name,
                    line.price_label()
                )?;
            }
        }
        if let Some(total) = &self.total {
            writeln!(f, "Total: {total}")?;
        }
        if let Some(badge) = self.badge.filter(BadgeView::is_visible) {
            writeln!(f, "Items: {}", badge.count)?;
        }
        Ok(())
    }
}

/// Apply a cart action against the file store and render the result.
pub fn run(catalog: &Catalog, store: &Path, action: &CartAction) -> String {
    let mut cart = Cart::load(catalog, FileStorage::new(store), TextSurface::default());

    match action {
        CartAction::Show => {}
        CartAction::Add { id } => {
            if catalog.get(*id).is_none() {
                tracing::warn!(product_id = %id, "Product is not in the catalog");
            }
            cart.add(*id);
        }
        CartAction::Remove { id } => cart.remove(*id),
    }

    cart.surface().to_string()
}
