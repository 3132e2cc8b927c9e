//! Cart line records and their persisted JSON form.
//!
//! The stored value is a JSON array of `{"id": <int>, "qty": <int>}` objects,
//! in first-add order. `qty` is always at least 1.

use std::collections::HashSet;
use std::num::NonZeroU32;

use aurelia_core::ProductId;
use serde::{Deserialize, Serialize, de};

/// One (product, quantity) pairing within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartLine {
    /// Referenced product. Not checked against the catalog.
    pub id: ProductId,
    #[serde(rename = "qty")]
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// A fresh line with quantity 1.
    #[must_use]
    pub const fn new(id: ProductId) -> Self {
        Self {
            id,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Bump the quantity by one, saturating at `u32::MAX`.
    pub const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }
}

/// Parse persisted cart lines.
///
/// A stored `null` is treated like an empty cart. A product may appear in
/// at most one line.
///
/// # Errors
///
/// Returns the `serde_json` error when the value is not the expected shape,
/// including when two lines share a product id.
pub fn parse_lines(raw: &str) -> Result<Vec<CartLine>, serde_json::Error> {
    let lines: Vec<CartLine> = serde_json::from_str::<Option<_>>(raw)?.unwrap_or_default();

    let mut seen = HashSet::with_capacity(lines.len());
    if let Some(dup) = lines.iter().find(|line| !seen.insert(line.id)) {
        return Err(de::Error::custom(format!(
            "duplicate cart line for product {}",
            dup.id
        )));
    }
    Ok(lines)
}

/// Serialize cart lines to their persisted form.
///
/// # Errors
///
/// Serialization of these plain records does not fail in practice; the error
/// is surfaced rather than unwrapped.
pub fn serialize_lines(lines: &[CartLine]) -> Result<String, serde_json::Error> {
    serde_json::to_string(lines)
}
