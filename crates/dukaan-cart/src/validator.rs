//! # Cart Validator
//!
//! Re-checks the whole cart against the live catalog and drives the store
//! back to a consistent state.
//!
//! ## Validation Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Validation Pass                                  │
//! │                                                                         │
//! │  snapshot items ──► fetch every catalog record ──► classify each       │
//! │   (lock held          (no lock held, may               line:           │
//! │    briefly)            suspend per item)          unchanged / changed  │
//! │                                                    / unavailable       │
//! │                              │                                          │
//! │                              ▼                                          │
//! │              apply ALL results in ONE batch write                       │
//! │              (remove unavailable, update price/stock,                   │
//! │               clamp quantity, single recompute)                         │
//! │                                                                         │
//! │  A catalog backend failure anywhere rejects the pass with the store    │
//! │  untouched. Overlapping passes are last-write-wins; callers debounce.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checked mutations (`add_checked`, `set_quantity_checked`) consult the
//! catalog first and reject instead of clamping; the store is only touched
//! after every check passes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use dukaan_core::{CatalogProduct, LineItem};

use crate::catalog::{CatalogError, CatalogLookup};
use crate::error::{CartError, CartResult};
use crate::store::CartStore;

// =============================================================================
// Check Results
// =============================================================================

/// Outcome of checking one line item against the live catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ItemCheck {
    /// Catalog record matches the cart line.
    Unchanged { id: String },

    /// Price and/or stock moved since the line was last refreshed.
    Changed {
        id: String,
        name: String,
        old_price: f64,
        new_price: f64,
        old_stock: i64,
        new_stock: i64,
        price_changed: bool,
        stock_changed: bool,
    },

    /// The product is gone (deleted or deactivated).
    Unavailable { id: String, name: String },
}

impl ItemCheck {
    /// Product id this check refers to.
    pub fn id(&self) -> &str {
        match self {
            ItemCheck::Unchanged { id }
            | ItemCheck::Changed { id, .. }
            | ItemCheck::Unavailable { id, .. } => id,
        }
    }
}

/// The collected results of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// One check per cart line, in cart order.
    pub checks: Vec<ItemCheck>,

    /// Whether applying the checks actually changed the store.
    pub applied: bool,
}

impl ValidationOutcome {
    /// Whether any line came back changed or unavailable.
    pub fn has_changes(&self) -> bool {
        self.checks
            .iter()
            .any(|c| !matches!(c, ItemCheck::Unchanged { .. }))
    }

    /// Names of products removed as unavailable, for presentation.
    pub fn removed_names(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter_map(|c| match c {
                ItemCheck::Unavailable { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

// =============================================================================
// Cart Validator
// =============================================================================

/// Orchestrates catalog-facing cart operations.
pub struct CartValidator {
    catalog: Arc<dyn CatalogLookup>,
}

impl CartValidator {
    /// Creates a validator over a catalog lookup implementation.
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        CartValidator { catalog }
    }

    /// Runs a full validation pass and applies the results atomically.
    ///
    /// ## Behavior
    /// - Unavailable lines are removed; changed lines get the new price and
    ///   stock with quantity clamped down (minimum 1)
    /// - All results land in one batch write with a single recompute;
    ///   `last_validated` is stamped only when something changed
    /// - Zero changes leave the store completely untouched
    /// - A catalog backend failure rejects the whole pass with the store
    ///   unchanged; retry is the caller's call
    pub async fn validate_prices(&self, store: &CartStore) -> CartResult<ValidationOutcome> {
        let items = store.with_cart(|cart| cart.items.clone());
        if items.is_empty() {
            debug!("validation skipped: cart empty");
            return Ok(ValidationOutcome {
                checks: Vec::new(),
                applied: false,
            });
        }

        store.with_cart_mut(|cart| cart.is_loading = true);

        match self.check_items(&items).await {
            Ok(checks) => {
                let applied = store.with_cart_mut(|cart| {
                    cart.is_loading = false;
                    cart.apply_checks(&checks)
                });
                if applied {
                    info!(lines = checks.len(), "validation pass applied changes");
                } else {
                    debug!(lines = checks.len(), "validation pass found no changes");
                }
                Ok(ValidationOutcome { checks, applied })
            }
            Err(err) => {
                warn!(error = %err, "validation pass failed");
                store.with_cart_mut(|cart| {
                    cart.is_loading = false;
                    cart.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    /// Checks every line against the catalog. No store access: the caller
    /// applies the results as one batch.
    async fn check_items(&self, items: &[LineItem]) -> CartResult<Vec<ItemCheck>> {
        let mut checks = Vec::with_capacity(items.len());

        for item in items {
            match self.catalog.get_by_id(&item.id).await {
                Ok(current) if !current.is_active => {
                    checks.push(ItemCheck::Unavailable {
                        id: item.id.clone(),
                        name: item.name.clone(),
                    });
                }
                Ok(current) => {
                    let new_stock = current.available_stock();
                    let price_changed = current.price != item.price;
                    let stock_changed = new_stock != item.stock;

                    if price_changed || stock_changed {
                        checks.push(ItemCheck::Changed {
                            id: item.id.clone(),
                            name: item.name.clone(),
                            old_price: item.price,
                            new_price: current.price,
                            old_stock: item.stock,
                            new_stock,
                            price_changed,
                            stock_changed,
                        });
                    } else {
                        checks.push(ItemCheck::Unchanged {
                            id: item.id.clone(),
                        });
                    }
                }
                Err(CatalogError::NotFound(_)) => {
                    checks.push(ItemCheck::Unavailable {
                        id: item.id.clone(),
                        name: item.name.clone(),
                    });
                }
                // One backend failure poisons the pass; nothing is applied.
                Err(CatalogError::Backend(message)) => {
                    return Err(CartError::ValidationFailed(message));
                }
            }
        }

        Ok(checks)
    }

    /// Adds a product after checking the live catalog.
    ///
    /// ## Rejections
    /// - unknown or inactive product → [`CartError::ProductUnavailable`]
    /// - zero stock, or the cart already holds the full stock →
    ///   [`CartError::InsufficientStock`]
    ///
    /// A rejection leaves the store unchanged.
    pub async fn add_checked(&self, store: &CartStore, product_id: &str) -> CartResult<()> {
        let product = self.fetch_active(product_id).await?;

        let available = product.available_stock();
        if available <= 0 {
            return Err(CartError::InsufficientStock {
                available: 0,
                unit: stock_unit(&product),
            });
        }

        let at_ceiling = store.with_cart(|cart| cart.quantity_of(product_id) >= available);
        if at_ceiling {
            return Err(CartError::InsufficientStock {
                available,
                unit: stock_unit(&product),
            });
        }

        debug!(product_id = %product_id, "checked add");
        store.with_cart_mut(|cart| cart.add(&product));
        Ok(())
    }

    /// Sets a quantity after checking the live catalog.
    ///
    /// Unlike the plain reducer, an over-stock request is rejected, not
    /// clamped. On success the line's price/stock/hierarchy fields are
    /// refreshed from the catalog record before the quantity is applied.
    pub async fn set_quantity_checked(
        &self,
        store: &CartStore,
        product_id: &str,
        quantity: i64,
    ) -> CartResult<()> {
        let product = self.fetch_active(product_id).await?;

        if quantity > product.available_stock() {
            return Err(CartError::InsufficientStock {
                available: product.available_stock(),
                unit: stock_unit(&product),
            });
        }

        debug!(product_id = %product_id, quantity, "checked set_quantity");
        store.with_cart_mut(|cart| {
            if let Some(item) = cart.items.iter_mut().find(|i| i.id == product_id) {
                item.refresh_from(&product);
            }
            cart.set_quantity(product_id, quantity);
        });
        Ok(())
    }

    /// Fetches a product, mapping missing/inactive to `ProductUnavailable`.
    async fn fetch_active(&self, product_id: &str) -> CartResult<CatalogProduct> {
        let product = match self.catalog.get_by_id(product_id).await {
            Ok(product) => product,
            Err(CatalogError::NotFound(id)) => {
                return Err(CartError::ProductUnavailable { name: id });
            }
            Err(err) => return Err(err.into()),
        };

        if !product.is_active {
            return Err(CartError::ProductUnavailable { name: product.name });
        }

        Ok(product)
    }
}

/// Unit used in stock messages, plural fallback as the storefront words it.
fn stock_unit(product: &CatalogProduct) -> String {
    product.unit.clone().unwrap_or_else(|| "pieces".to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
