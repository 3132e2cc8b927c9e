//! Page surface contract for the cart.
//!
//! The cart never scans a page for elements. A host declares which render
//! targets it provides through [`SurfaceTargets`]; the cart only writes to
//! declared targets and treats missing ones as no-ops.

use super::view::{BadgeView, CartView};

/// Panel (and overlay) visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

impl PanelState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Class names of the controls the cart binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartControls {
    /// Elements that open the panel (header icon, "view cart" links).
    pub open_triggers: &'static [&'static str],
    /// Explicit close button inside the panel.
    pub close: &'static str,
    /// Background overlay; clicking it closes the panel.
    pub overlay: &'static str,
    /// Per-row remove affordance, tagged with the product id.
    pub remove: &'static str,
}

/// The fixed control set used by every Aurelia page.
pub const CART_CONTROLS: CartControls = CartControls {
    open_triggers: &["cart-icon", "view-cart-trigger"],
    close: "close-cart",
    overlay: "cart-overlay-bg",
    remove: "cart-item-remove",
};

/// Render targets a host page provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceTargets {
    /// Insertion point for the panel markup (sidebar + overlay).
    pub panel: bool,
    /// Container for line rows.
    pub items: bool,
    /// Total display element.
    pub total: bool,
    /// Number of quantity badges on the page. Zero means none.
    pub badges: usize,
}

impl SurfaceTargets {
    /// A page with nothing for the cart to draw on.
    pub const NONE: Self = Self {
        panel: false,
        items: false,
        total: false,
        badges: 0,
    };

    /// A regular storefront page: panel, rows, total, header and mobile badges.
    pub const FULL_PAGE: Self = Self {
        panel: true,
        items: true,
        total: true,
        badges: 2,
    };
}

/// Rendering adapter the cart pushes its state into.
///
/// The cart calls each method only when the matching target is declared in
/// [`CartSurface::targets`].
pub trait CartSurface {
    fn targets(&self) -> SurfaceTargets;

    /// Insert the panel markup. Called once per page load.
    fn mount_panel(&mut self);

    /// Wire the cart's controls to its operations.
    fn bind_controls(&mut self, controls: &'static CartControls);

    /// Replace the line-items container contents.
    fn show_items(&mut self, view: &CartView);

    /// Replace the total display text.
    fn show_total(&mut self, total: &str);

    /// Update every badge to the same value.
    fn show_badges(&mut self, badge: BadgeView);

    /// Apply panel and overlay visibility together.
    fn show_panel(&mut self, state: PanelState);
}

impl<T: CartSurface + ?Sized> CartSurface for &mut T {
    fn targets(&self) -> SurfaceTargets {
        (**self).targets()
    }

    fn mount_panel(&mut self) {
        (**self).mount_panel();
    }

    fn bind_controls(&mut self, controls: &'static CartControls) {
        (**self).bind_controls(controls);
    }

    fn show_items(&mut self, view: &CartView) {
        (**self).show_items(view);
    }

    fn show_total(&mut self, total: &str) {
        (**self).show_total(total);
    }

    fn show_badges(&mut self, badge: BadgeView) {
        (**self).show_badges(badge);
    }

    fn show_panel(&mut self, state: PanelState) {
        (**self).show_panel(state);
    }
}

/// Badge element ids on a full storefront page.
pub const PAGE_BADGE_IDS: &[&str] = &["cart-badge-header", "cart-badge-mobile"];

/// Surface for server-rendered pages.
///
/// Records what the cart drew so askama templates can render it. Fields stay
/// `None` for targets the cart never wrote to.
#[derive(Debug, Clone, Default)]
pub struct PageSurface {
    targets: SurfaceTargets,
    mounted: bool,
    controls: Option<&'static CartControls>,
    items: Option<CartView>,
    total: Option<String>,
    badge: Option<BadgeView>,
    panel: PanelState,
}

impl PageSurface {
    /// Surface for a standard page with every target present.
    #[must_use]
    pub fn full_page() -> Self {
        Self::with_targets(SurfaceTargets {
            badges: PAGE_BADGE_IDS.len(),
            ..SurfaceTargets::FULL_PAGE
        })
    }

    #[must_use]
    pub fn with_targets(targets: SurfaceTargets) -> Self {
        Self {
            targets,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub const fn controls(&self) -> Option<&'static CartControls> {
        self.controls
    }

    #[must_use]
    pub const fn items(&self) -> Option<&CartView> {
        self.items.as_ref()
    }

    #[must_use]
    pub fn total(&self) -> Option<&str> {
        self.total.as_deref()
    }

    #[must_use]
    pub const fn badge(&self) -> Option<BadgeView> {
        self.badge
    }

    #[must_use]
    pub const fn panel(&self) -> PanelState {
        self.panel
    }

    /// Ids of the badge elements this page carries.
    #[must_use]
    pub fn badge_ids(&self) -> &'static [&'static str] {
        let count = self.targets.badges.min(PAGE_BADGE_IDS.len());
        PAGE_BADGE_IDS.get(..count).unwrap_or_default()
    }
}

impl CartSurface for PageSurface {
    fn targets(&self) -> SurfaceTargets {
        self.targets
    }

    fn mount_panel(&mut self) {
        self.mounted = true;
    }

    fn bind_controls(&mut self, controls: &'static CartControls) {
        self.controls = Some(controls);
    }

    fn show_items(&mut self, view: &CartView) {
        self.items = Some(view.clone());
    }

    fn show_total(&mut self, total: &str) {
        self.total = Some(total.to_string());
    }

    fn show_badges(&mut self, badge: BadgeView) {
        self.badge = Some(badge);
    }

    fn show_panel(&mut self, state: PanelState) {
        self.panel = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_page_declares_every_target() {
        let surface = PageSurface::full_page();
        let targets = surface.targets();
        assert!(targets.panel && targets.items && targets.total);
        assert_eq!(surface.badge_ids(), PAGE_BADGE_IDS);
    }

    #[test]
    fn test_badge_ids_follow_declared_count() {
        let surface = PageSurface::with_targets(SurfaceTargets {
            badges: 1,
            ..SurfaceTargets::NONE
        });
        assert_eq!(surface.badge_ids(), &["cart-badge-header"]);
        assert!(PageSurface::with_targets(SurfaceTargets::NONE).badge_ids().is_empty());
    }
}
