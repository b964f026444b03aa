//! # Cart Store
//!
//! The authoritative in-memory cart: line items plus derived totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Frontend Action          Store Operation          State Change         │
//! │  ───────────────          ───────────────          ────────────         │
//! │                                                                         │
//! │  Click Product ──────────► add(product) ─────────► push / qty+1        │
//! │                                                                         │
//! │  Change Quantity ────────► set_quantity(id, n) ──► clamp to stock      │
//! │                                                                         │
//! │  Click Remove ───────────► remove(id) ───────────► retain filter       │
//! │                                                                         │
//! │  Click Clear ────────────► clear() ──────────────► empty state         │
//! │                                                                         │
//! │  EVERY mutation above ends in recompute(): deals first, then the       │
//! │  hierarchy-resolved total and item count. Derived fields are never     │
//! │  written any other way, so they can never go stale.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! Synchronous mutations do not fail. Inputs are clamped rather than
//! rejected; anomalies from bad external data degrade to safe values.
//! The checked variants that do reject live in [`crate::validator`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use dukaan_core::{compute_deals, resolve_price, CatalogProduct, DealsSummary, LineItem};

use crate::validator::ItemCheck;

// =============================================================================
// Cart
// =============================================================================

/// The cart state: items in insertion order plus derived totals.
///
/// ## Invariants
/// - Items are unique by product `id` (adding the same product increments
///   quantity)
/// - `1 <= quantity <= stock` holds after every mutation, by clamping
/// - `total`, `item_count` and `deals_summary` are outputs of
///   [`Cart::recompute`] only
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Line items, insertion order preserved.
    pub items: Vec<LineItem>,

    /// Derived: Σ resolved price × quantity − deal savings.
    pub total: f64,

    /// Derived: Σ quantity across items.
    pub item_count: i64,

    /// Derived: every applied deal plus total savings.
    pub deals_summary: DealsSummary,

    /// When the last validation pass changed something.
    pub last_validated: Option<DateTime<Utc>>,

    /// Message from the last failed async operation.
    pub error: Option<String>,

    /// Set only around async validation/add operations.
    pub is_loading: bool,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from rehydrated items, recomputing all derived
    /// fields. The persistence layer lives outside this crate; whatever it
    /// stored, derived values are never trusted from storage.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut cart = Cart {
            items,
            ..Cart::default()
        };
        cart.recompute();
        cart
    }

    /// Adds a product to the cart, or increments its quantity if present.
    ///
    /// ## Behavior
    /// - Existing item: quantity becomes `min(current + 1, product stock)`;
    ///   price, stock and the pricing-hierarchy fields are refreshed from
    ///   the record (they may have changed since the last add)
    /// - New item: inserted with quantity 1 and display defaults
    ///
    /// A full stock ceiling leaves the quantity unchanged; the refresh and
    /// recompute still run.
    pub fn add(&mut self, product: &CatalogProduct) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            let next = (item.quantity + 1).min(product.available_stock());
            if next > item.quantity {
                item.quantity = next;
                item.updated_at = Utc::now();
            }
            item.refresh_from(product);
        } else {
            self.items.push(LineItem::from_product(product));
        }

        self.recompute();
    }

    /// Removes an item by product id. Silent no-op when absent.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
        self.recompute();
    }

    /// Sets an item's quantity.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: the item is removed, not zeroed
    /// - otherwise: clamped into `1..=stock` against the item's last-known
    ///   stock, and `updated_at` is stamped
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity.min(item.stock).max(1);
            item.updated_at = Utc::now();
        }

        self.recompute();
    }

    /// Clears the cart back to its empty state.
    ///
    /// Items, derived totals, `error` and `last_validated` all reset;
    /// `is_loading` is left to the async operation that owns it.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = 0.0;
        self.item_count = 0;
        self.deals_summary = DealsSummary::default();
        self.error = None;
        self.last_validated = None;
    }

    /// Recomputes every derived field from the items.
    ///
    /// Deals first, then per item `resolve_price × quantity` minus that
    /// item's savings, summed. Idempotent: a second call without an
    /// intervening mutation changes nothing.
    pub(crate) fn recompute(&mut self) {
        self.deals_summary = compute_deals(&self.items);

        let mut total = 0.0;
        for item in &self.items {
            let line_total = resolve_price(item) * item.quantity as f64;
            let item_savings: f64 = self
                .deals_summary
                .applied_deals
                .iter()
                .filter(|deal| deal.product_id == item.id)
                .map(|deal| deal.savings)
                .sum();
            total += line_total - item_savings;
        }

        self.total = total;
        self.item_count = self.items.iter().map(|i| i.quantity).sum();
    }

    /// Applies one validation pass's results as a single batch.
    ///
    /// Unavailable items are removed; changed items get the new price and
    /// stock with quantity clamped down to the new ceiling (minimum 1).
    /// Exactly one recompute runs, and `last_validated` is stamped, only
    /// when something actually changed.
    ///
    /// Returns whether the cart changed.
    pub(crate) fn apply_checks(&mut self, checks: &[ItemCheck]) -> bool {
        let mut changed = false;

        for check in checks {
            match check {
                ItemCheck::Unchanged { .. } => {}
                ItemCheck::Unavailable { id, .. } => {
                    let before = self.items.len();
                    self.items.retain(|i| i.id != *id);
                    changed |= self.items.len() != before;
                }
                ItemCheck::Changed {
                    id,
                    new_price,
                    new_stock,
                    ..
                } => {
                    if let Some(item) = self.items.iter_mut().find(|i| i.id == *id) {
                        item.price = *new_price;
                        item.stock = *new_stock;
                        if item.quantity > *new_stock {
                            item.quantity = (*new_stock).max(1);
                        }
                        changed = true;
                    }
                }
            }
        }

        if changed {
            self.recompute();
            self.last_validated = Some(Utc::now());
        }

        changed
    }

    /// Checks whether the cart has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Quantity of a product in the cart, 0 when absent.
    pub fn quantity_of(&self, id: &str) -> i64 {
        self.items
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// Total deal savings across the cart.
    #[inline]
    pub fn savings(&self) -> f64 {
        self.deals_summary.total_savings
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Shared handle to the cart.
///
/// ## Thread Safety
/// One mutex guards the whole cart: every mutation runs to completion
/// before another is observed, which is the single-writer reducer model
/// the storefront relies on. Async validation never holds the lock across
/// an await; it reads a snapshot, awaits the catalog, then applies one
/// batch write.
#[derive(Debug, Default)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        CartStore::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = store.with_cart(|cart| cart.total);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// store.with_cart_mut(|cart| cart.add(&product));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("cart mutex poisoned");
        f(&mut cart)
    }

    /// Adds a product (unchecked; see `CartValidator::add_checked` for the
    /// catalog-verified variant).
    pub fn add(&self, product: &CatalogProduct) {
        debug!(product_id = %product.id, "cart add");
        self.with_cart_mut(|cart| cart.add(product));
    }

    /// Removes an item by product id.
    pub fn remove(&self, id: &str) {
        debug!(product_id = %id, "cart remove");
        self.with_cart_mut(|cart| cart.remove(id));
    }

    /// Sets an item's quantity (0 removes).
    pub fn set_quantity(&self, id: &str, quantity: i64) {
        debug!(product_id = %id, quantity, "cart set_quantity");
        self.with_cart_mut(|cart| cart.set_quantity(id, quantity));
    }

    /// Clears the cart. Called on explicit clear and after a successful
    /// order submission.
    pub fn clear(&self) {
        debug!("cart clear");
        self.with_cart_mut(Cart::clear);
    }

    /// Returns a clone of the current cart state.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
