//! # Order Assembler
//!
//! Packages validated cart items and checkout totals into the order draft
//! the order service consumes. Thin by design: customer, payment and
//! session fields are attached by the caller.
//!
//! ## Submit-Time Revalidation
//! Between the cart view and the final submit, catalog prices may move.
//! `prepare_order` therefore re-fetches every line at submit time, prices
//! the order at the validated catalog prices, and recomputes deal savings
//! and totals from those, independent of whatever the live cart cached.
//! Any item that cannot be confirmed rejects the whole draft; an order is
//! never assembled from a half-validated cart.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dukaan_core::{compute_totals, CheckoutPolicy, CheckoutTotals, PaymentMethodDescriptor};

use crate::catalog::CatalogLookup;
use crate::error::{CartError, CartResult};
use crate::store::CartStore;

// =============================================================================
// Order Contract
// =============================================================================

/// One order line, priced at the validated catalog price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub image: String,
}

/// The order-service input contract owned by this core.
///
/// The caller attaches customer, payment and session fields before
/// submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Validated order lines.
    pub items: Vec<OrderLine>,

    /// Discounted subtotal (after deal savings).
    pub subtotal: f64,

    /// Deal savings recomputed against validated prices.
    pub deal_savings: f64,

    /// Delivery charge per policy.
    pub delivery_charge: f64,

    /// Payment gateway surcharge.
    pub gateway_fee: f64,

    /// Grand total the customer pays.
    pub total: f64,
}

impl OrderDraft {
    fn from_totals(items: Vec<OrderLine>, totals: &CheckoutTotals) -> Self {
        OrderDraft {
            items,
            subtotal: totals.subtotal,
            deal_savings: totals.deal_savings,
            delivery_charge: totals.delivery_charge,
            gateway_fee: totals.gateway_fee,
            total: totals.grand_total,
        }
    }
}

// =============================================================================
// Order Assembler
// =============================================================================

/// Builds order drafts from the cart at submission time.
pub struct OrderAssembler {
    catalog: Arc<dyn CatalogLookup>,
}

impl OrderAssembler {
    /// Creates an assembler over a catalog lookup implementation.
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        OrderAssembler { catalog }
    }

    /// Revalidates the cart against the live catalog and assembles an
    /// order draft.
    ///
    /// ## Behavior
    /// - An empty cart is rejected outright
    /// - Every line is re-fetched; its order price is the current catalog
    ///   price, not the cart's cached one
    /// - Deal savings, delivery charge and gateway fee are recomputed from
    ///   the validated prices
    /// - Any line that cannot be confirmed rejects the whole draft with
    ///   [`CartError::ValidationFailed`]; the cart is left untouched
    ///
    /// Clearing the cart after the order is accepted is the caller's step,
    /// once the order service confirms creation.
    pub async fn prepare_order(
        &self,
        store: &CartStore,
        method: Option<&PaymentMethodDescriptor>,
        policy: &CheckoutPolicy,
    ) -> CartResult<OrderDraft> {
        let items = store.with_cart(|cart| cart.items.clone());
        if items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        // Revalidate every line before any math: the draft is priced off
        // the catalog's answers, never the cart's cache.
        let mut validated = Vec::with_capacity(items.len());
        for item in &items {
            let current = match self.catalog.get_by_id(&item.id).await {
                Ok(current) if current.is_active => current,
                _ => {
                    return Err(CartError::ValidationFailed(format!(
                        "Failed to validate {}",
                        item.name
                    )));
                }
            };

            debug!(product_id = %item.id, price = current.price, "order line validated");
            let mut line = item.clone();
            line.price = current.price;
            validated.push(line);
        }

        let totals = compute_totals(&validated, method, policy);
        let lines = validated
            .into_iter()
            .map(|item| OrderLine {
                id: item.id,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                image: item.image,
            })
            .collect();

        let draft = OrderDraft::from_totals(lines, &totals);
        info!(
            lines = draft.items.len(),
            total = draft.total,
            "order draft assembled"
        );
        Ok(draft)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use dukaan_core::{CatalogProduct, DealType, FeeTerms};

    fn test_product(id: &str, price: f64, stock: i64) -> CatalogProduct {
        serde_json::from_str(&format!(
            r#"{{"id":"{}","name":"Product {}","price":{},"stock":{}}}"#,
            id, id, price, stock
        ))
        .unwrap()
    }

    fn seeded(products: Vec<CatalogProduct>) -> (Arc<InMemoryCatalog>, OrderAssembler, CartStore) {
        let catalog = Arc::new(InMemoryCatalog::new());
        for product in products {
            catalog.insert(product);
        }
        let assembler = OrderAssembler::new(catalog.clone());
        (catalog, assembler, CartStore::new())
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let (_catalog, assembler, store) = seeded(vec![]);
        let err = assembler
            .prepare_order(&store, None, &CheckoutPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::EmptyCart));
    }

    #[tokio::test]
    async fn test_draft_uses_validated_prices() {
        let (catalog, assembler, store) = seeded(vec![test_product("1", 100.0, 10)]);
        let product = test_product("1", 100.0, 10);
        store.add(&product);
        store.add(&product);

        // Price moves between cart view and submit.
        catalog.update("1", |p| p.price = 120.0);

        let draft = assembler
            .prepare_order(&store, None, &CheckoutPolicy::default())
            .await
            .unwrap();

        assert_eq!(draft.items[0].price, 120.0);
        assert_eq!(draft.subtotal, 240.0);
        assert_eq!(draft.delivery_charge, 150.0);
        assert_eq!(draft.total, 390.0);

        // The live cart still holds its cached price; only the draft
        // re-priced.
        store.with_cart(|cart| assert_eq!(cart.items[0].price, 100.0));
    }

    #[tokio::test]
    async fn test_savings_recomputed_at_validated_price() {
        let (catalog, assembler, store) = seeded(vec![test_product("1", 100.0, 10)]);
        let mut product = test_product("1", 100.0, 10);
        product.deal_type = Some(DealType::Bogo);
        for _ in 0..4 {
            store.add(&product);
        }
        assert_eq!(store.with_cart(|c| c.savings()), 200.0);

        catalog.update("1", |p| p.price = 150.0);
        let draft = assembler
            .prepare_order(&store, None, &CheckoutPolicy::default())
            .await
            .unwrap();

        // 2 free units at the validated 150, not the cached 100.
        assert_eq!(draft.deal_savings, 300.0);
        assert_eq!(draft.subtotal, 4.0 * 150.0 - 300.0);
    }

    #[tokio::test]
    async fn test_gateway_fee_from_validated_subtotal() {
        let (_catalog, assembler, store) = seeded(vec![test_product("1", 1000.0, 10)]);
        store.add(&test_product("1", 1000.0, 10));

        let method = PaymentMethodDescriptor {
            id: "jazzcash".to_string(),
            name: "JazzCash".to_string(),
            enabled: true,
            fee: Some(FeeTerms::Proportional(0.02)),
            minimum_fee: Some(10.0),
        };

        let draft = assembler
            .prepare_order(&store, Some(&method), &CheckoutPolicy::default())
            .await
            .unwrap();

        assert_eq!(draft.gateway_fee, 20.0);
        assert_eq!(draft.total, 1000.0 + 150.0 + 20.0);
    }

    #[tokio::test]
    async fn test_missing_line_rejects_draft() {
        let (catalog, assembler, store) = seeded(vec![
            test_product("1", 100.0, 10),
            test_product("2", 50.0, 10),
        ]);
        store.add(&test_product("1", 100.0, 10));
        store.add(&test_product("2", 50.0, 10));

        catalog.remove("2");
        let err = assembler
            .prepare_order(&store, None, &CheckoutPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::ValidationFailed(_)));
        // Nothing partial: the cart keeps both lines.
        store.with_cart(|cart| assert_eq!(cart.items.len(), 2));
    }

    #[tokio::test]
    async fn test_draft_serializes_contract_shape() {
        let (_catalog, assembler, store) = seeded(vec![test_product("1", 100.0, 10)]);
        store.add(&test_product("1", 100.0, 10));

        let draft = assembler
            .prepare_order(&store, None, &CheckoutPolicy::default())
            .await
            .unwrap();
        let json = serde_json::to_value(&draft).unwrap();

        assert!(json.get("items").is_some());
        assert!(json.get("dealSavings").is_some());
        assert!(json.get("deliveryCharge").is_some());
        assert!(json.get("gatewayFee").is_some());
        assert!(json.get("total").is_some());
        assert!(json["items"][0].get("image").is_some());
    }
}
