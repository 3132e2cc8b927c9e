//! Persisted shopping cart.
//!
//! A [`Cart`] owns the ordered list of cart lines for one page load. It is
//! built from three injected collaborators:
//!
//! - a [`Catalog`] for product lookups (read-only)
//! - a [`CartStorage`] holding the persisted state under [`CART_STORAGE_KEY`]
//! - a [`CartSurface`] that displays panel, rows, total, and badges
//!
//! Every mutation persists the whole state and re-renders before returning.
//! No operation fails: unreadable storage yields an empty cart, failed writes
//! are logged, unknown products are left out of the rendering.
//!
//! # Example
//!
//! ```rust
//! use aurelia_core::ProductId;
//! use aurelia_storefront::cart::{Cart, MemoryStorage, PageSurface};
//! use aurelia_storefront::catalog::Catalog;
//!
//! let catalog = Catalog::builtin();
//! let mut cart = Cart::load(&catalog, MemoryStorage::new(), PageSurface::full_page());
//! cart.add(ProductId::new(1));
//! cart.add(ProductId::new(1));
//! assert_eq!(cart.badge().count, 2);
//! ```

mod line;
mod storage;
mod surface;
mod view;

pub use line::{CartLine, parse_lines, serialize_lines};
pub use storage::{
    CartStorage, CookieStorage, FileStorage, MAX_COOKIE_BYTES, MemoryStorage, StorageError,
};
pub use surface::{
    CART_CONTROLS, CartControls, CartSurface, PAGE_BADGE_IDS, PageSurface, PanelState,
    SurfaceTargets,
};
pub use view::{BadgeView, CartLineView, CartView, EMPTY_CART_MESSAGE};

use aurelia_core::ProductId;

use crate::catalog::Catalog;

/// Storage key for the persisted cart.
pub const CART_STORAGE_KEY: &str = "aurelia_cart";

/// A cart bound to its catalog, storage, and page surface.
pub struct Cart<'a, S, U> {
    catalog: &'a Catalog,
    storage: S,
    surface: U,
    lines: Vec<CartLine>,
    panel: PanelState,
}

impl<'a, S: CartStorage, U: CartSurface> Cart<'a, S, U> {
    /// Restore the cart from storage and draw it onto the surface.
    ///
    /// Absent or malformed stored state yields an empty cart.
    pub fn load(catalog: &'a Catalog, storage: S, surface: U) -> Self {
        let lines = restore(&storage);
        let mut cart = Self {
            catalog,
            storage,
            surface,
            lines,
            panel: PanelState::Closed,
        };
        cart.mount();
        cart
    }

    fn mount(&mut self) {
        let targets = self.surface.targets();
        if targets.panel {
            self.surface.mount_panel();
        }
        self.update_badges();
        self.surface.bind_controls(&CART_CONTROLS);
        self.render();
    }

    /// Add one unit of a product.
    ///
    /// Existing lines are incremented in place; new products are appended.
    /// The product id is not validated. Persists, re-renders, and opens the
    /// panel.
    pub fn add(&mut self, product_id: ProductId) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == product_id) {
            line.increment();
        } else {
            self.lines.push(CartLine::new(product_id));
        }
        tracing::debug!(%product_id, "Added product to cart");

        self.save();
        self.render();
        self.open();
    }

    /// Remove a product's line, if present. Panel visibility is unchanged.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != product_id);
        if self.lines.len() == before {
            tracing::debug!(%product_id, "Remove requested for product not in cart");
        }

        self.save();
        self.render();
    }

    /// Recompute the view and replace the surface's rows and total.
    ///
    /// Calling this repeatedly without mutations yields the same view.
    pub fn render(&mut self) -> CartView {
        let view = self.view();
        let targets = self.surface.targets();
        if targets.items {
            self.surface.show_items(&view);
        }
        if targets.total {
            self.surface.show_total(&view.total_display());
        }
        view
    }

    /// Project the current state without touching the surface.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::project(&self.lines, self.catalog)
    }

    /// Show the panel and overlay.
    pub fn open(&mut self) {
        self.set_panel(PanelState::Open);
    }

    /// Hide the panel and overlay.
    pub fn close(&mut self) {
        self.set_panel(PanelState::Closed);
    }

    fn set_panel(&mut self, state: PanelState) {
        self.panel = state;
        if self.surface.targets().panel {
            self.surface.show_panel(state);
        }
    }

    #[must_use]
    pub fn badge(&self) -> BadgeView {
        BadgeView::from_lines(&self.lines)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity for a product, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.id == product_id)
            .map_or(0, |l| l.quantity.get())
    }

    #[must_use]
    pub const fn panel(&self) -> PanelState {
        self.panel
    }

    #[must_use]
    pub const fn surface(&self) -> &U {
        &self.surface
    }

    /// Give back the storage and surface, e.g. to emit cookies and render.
    pub fn into_parts(self) -> (S, U) {
        (self.storage, self.surface)
    }

    fn save(&mut self) {
        match serialize_lines(&self.lines) {
            Ok(json) => {
                if let Err(e) = self.storage.set_item(CART_STORAGE_KEY, &json) {
                    tracing::warn!("Failed to persist cart: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize cart: {e}"),
        }
        self.update_badges();
    }

    fn update_badges(&mut self) {
        if self.surface.targets().badges > 0 {
            let badge = self.badge();
            self.surface.show_badges(badge);
        }
    }
}

/// Read persisted lines, falling back to an empty cart.
fn restore<S: CartStorage>(storage: &S) -> Vec<CartLine> {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to read stored cart: {e}");
            return Vec::new();
        }
    };

    parse_lines(&raw).unwrap_or_else(|e| {
        tracing::debug!("Discarding malformed stored cart: {e}");
        Vec::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aurelia_core::Price;

    use super::*;

    /// Surface that records every call, for checking what the cart drew.
    #[derive(Default)]
    struct RecordingSurface {
        targets: SurfaceTargets,
        mounts: usize,
        bound: bool,
        items: Vec<CartView>,
        totals: Vec<String>,
        badges: Vec<BadgeView>,
        panels: Vec<PanelState>,
    }

    impl RecordingSurface {
        fn full() -> Self {
            Self {
                targets: SurfaceTargets::FULL_PAGE,
                ..Self::default()
            }
        }
    }

    impl CartSurface for RecordingSurface {
        fn targets(&self) -> SurfaceTargets {
            self.targets
        }
        fn mount_panel(&mut self) {
            self.mounts += 1;
        }
        fn bind_controls(&mut self, _controls: &'static CartControls) {
            self.bound = true;
        }
        fn show_items(&mut self, view: &CartView) {
            self.items.push(view.clone());
        }
        fn show_total(&mut self, total: &str) {
            self.totals.push(total.to_string());
        }
        fn show_badges(&mut self, badge: BadgeView) {
            self.badges.push(badge);
        }
        fn show_panel(&mut self, state: PanelState) {
            self.panels.push(state);
        }
    }

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    fn stored(lines: &str) -> MemoryStorage {
        MemoryStorage::with_item(CART_STORAGE_KEY, lines)
    }

    #[test]
    fn test_load_draws_initial_state() {
        let catalog = Catalog::builtin();
        let cart = Cart::load(
            &catalog,
            stored(r#"[{"id":1,"qty":2}]"#),
            RecordingSurface::full(),
        );
        let surface = cart.surface();

        assert_eq!(surface.mounts, 1);
        assert!(surface.bound);
        assert_eq!(surface.badges, vec![BadgeView { count: 2 }]);
        assert_eq!(surface.items.len(), 1);
        assert_eq!(surface.totals, vec!["$2,500".to_string()]);
        assert!(surface.panels.is_empty());
        assert_eq!(cart.panel(), PanelState::Closed);
    }

    #[test]
    fn test_add_accumulates_in_first_add_order() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());
        cart.add(id(1));
        cart.add(id(1));
        cart.add(id(2));

        let (storage, _) = cart.into_parts();
        assert_eq!(
            storage.raw(CART_STORAGE_KEY),
            Some(r#"[{"id":1,"qty":2},{"id":2,"qty":1}]"#)
        );
    }

    #[test]
    fn test_add_badge_scenario() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());
        cart.add(id(1));
        cart.add(id(1));
        cart.add(id(2));

        assert_eq!(cart.badge().count, 3);
        assert_eq!(cart.surface().badges.last(), Some(&BadgeView { count: 3 }));
    }

    #[test]
    fn test_quantity_equals_number_of_adds() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());
        for n in 1..=5 {
            cart.add(id(4));
            cart.add(id(5));
            assert_eq!(cart.quantity_of(id(4)), n);
        }
        cart.remove(id(4));
        assert_eq!(cart.quantity_of(id(4)), 0);
        assert_eq!(cart.quantity_of(id(5)), 5);
    }

    #[test]
    fn test_add_accepts_unknown_ids() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());
        cart.add(id(404));

        assert_eq!(cart.quantity_of(id(404)), 1);
        assert!(cart.view().lines.is_empty());
        assert_eq!(cart.badge().count, 1);
    }

    #[test]
    fn test_remove_is_complete() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(
            &catalog,
            stored(r#"[{"id":1,"qty":3},{"id":2,"qty":1}]"#),
            RecordingSurface::full(),
        );
        cart.remove(id(1));

        assert!(cart.lines().iter().all(|l| l.id != id(1)));
        let rendered = cart.surface().items.last().unwrap();
        assert!(rendered.lines.iter().all(|row| row.product_id != id(1)));
        assert_eq!(cart.badge().count, 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(
            &catalog,
            stored(r#"[{"id":2,"qty":1}]"#),
            RecordingSurface::full(),
        );
        cart.remove(id(6));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_render_is_idempotent() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(
            &catalog,
            stored(r#"[{"id":3,"qty":1},{"id":1,"qty":2}]"#),
            RecordingSurface::full(),
        );
        let first = cart.render();
        let second = cart.render();
        assert_eq!(first, second);

        let surface = cart.surface();
        let n = surface.items.len();
        assert_eq!(surface.items[n - 1], surface.items[n - 2]);
        assert_eq!(surface.totals[n - 1], surface.totals[n - 2]);
    }

    #[test]
    fn test_persistence_round_trip() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());
        cart.add(id(3));
        cart.add(id(1));
        cart.add(id(3));
        let before = cart.lines().to_vec();

        let (storage, _) = cart.into_parts();
        let reloaded = Cart::load(&catalog, storage, RecordingSurface::full());
        assert_eq!(reloaded.lines(), before.as_slice());
    }

    #[test]
    fn test_malformed_storage_yields_empty_cart() {
        let catalog = Catalog::builtin();
        for raw in [
            "",
            "{oops",
            r#"{"id":1}"#,
            r#"[{"id":1,"qty":0}]"#,
            "42",
            r#"[{"id":1,"qty":1},{"id":1,"qty":2}]"#,
        ] {
            let cart = Cart::load(&catalog, stored(raw), RecordingSurface::full());
            assert!(cart.lines().is_empty(), "expected empty cart for {raw:?}");
            assert_eq!(cart.surface().totals, vec!["$0".to_string()]);
        }
    }

    #[test]
    fn test_unknown_product_scenario() {
        // A catalog that no longer carries product 3.
        let catalog = Catalog::new(
            Catalog::builtin()
                .products()
                .iter()
                .filter(|p| p.id != id(3))
                .cloned()
                .collect(),
        )
        .unwrap();
        let cart = Cart::load(
            &catalog,
            stored(r#"[{"id":1,"qty":2},{"id":3,"qty":1}]"#),
            RecordingSurface::full(),
        );

        let view = cart.view();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].product_id, id(1));
        assert_eq!(view.total, Price::new(1250) * 2);
        assert_eq!(cart.badge().count, 3);
        // The stale line stays persisted until removed.
        assert_eq!(cart.quantity_of(id(3)), 1);
    }

    #[test]
    fn test_empty_scenario() {
        let catalog = Catalog::builtin();
        let cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());

        let view = cart.surface().items.last().unwrap();
        assert_eq!(view.empty_message(), Some(EMPTY_CART_MESSAGE));
        assert_eq!(cart.surface().totals.last().unwrap(), "$0");
        assert!(!cart.surface().badges.last().unwrap().is_visible());
    }

    #[test]
    fn test_add_opens_and_remove_keeps_panel_open() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());
        cart.add(id(2));
        assert_eq!(cart.panel(), PanelState::Open);

        cart.remove(id(2));
        assert_eq!(cart.panel(), PanelState::Open);
        assert_eq!(cart.surface().panels, vec![PanelState::Open]);
    }

    #[test]
    fn test_open_close_transitions() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, MemoryStorage::new(), RecordingSurface::full());
        cart.open();
        cart.close();
        cart.close();
        assert_eq!(cart.panel(), PanelState::Closed);
        assert_eq!(
            cart.surface().panels,
            vec![PanelState::Open, PanelState::Closed, PanelState::Closed]
        );
    }

    #[test]
    fn test_missing_targets_are_noops() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::load(
            &catalog,
            MemoryStorage::new(),
            RecordingSurface {
                targets: SurfaceTargets::NONE,
                ..RecordingSurface::default()
            },
        );
        cart.add(id(1));
        cart.remove(id(1));
        cart.open();

        let surface = cart.surface();
        assert_eq!(surface.mounts, 0);
        assert!(surface.items.is_empty());
        assert!(surface.totals.is_empty());
        assert!(surface.badges.is_empty());
        assert!(surface.panels.is_empty());
        // State and persistence still work without a surface.
        assert_eq!(cart.panel(), PanelState::Open);
    }

    #[test]
    fn test_failed_write_does_not_fail_add() {
        struct ReadOnly;
        impl CartStorage for ReadOnly {
            fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(None)
            }
            fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError::InvalidKey(key.to_string()))
            }
        }

        let catalog = Catalog::builtin();
        let mut cart = Cart::load(&catalog, ReadOnly, RecordingSurface::full());
        cart.add(id(1));
        assert_eq!(cart.quantity_of(id(1)), 1);
        assert_eq!(cart.surface().badges.last(), Some(&BadgeView { count: 1 }));
    }

    #[test]
    fn test_works_with_page_surface() {
        let catalog = Catalog::builtin();
        let mut storage = MemoryStorage::new();
        let mut cart = Cart::load(&catalog, &mut storage, PageSurface::full_page());
        cart.add(id(6));

        let (_, surface) = cart.into_parts();
        assert!(surface.is_mounted());
        assert_eq!(surface.controls(), Some(&CART_CONTROLS));
        assert_eq!(surface.panel(), PanelState::Open);
        assert_eq!(surface.total(), Some("$7,500"));
        assert_eq!(surface.badge(), Some(BadgeView { count: 1 }));
        assert!(storage.raw(CART_STORAGE_KEY).is_some());
    }
}
