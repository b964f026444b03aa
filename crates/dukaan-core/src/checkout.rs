//! # Checkout Totals Calculator
//!
//! Turns resolved cart items plus a payment method into the totals block
//! shown at checkout and submitted with an order.
//!
//! ## Totals Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Totals                                      │
//! │                                                                         │
//! │  items ──► original_subtotal = Σ price × quantity   (nominal price)     │
//! │      │                                                                  │
//! │      └───► deal_savings      = Deal Engine, recomputed right here       │
//! │                                                                         │
//! │  subtotal        = max(0, original_subtotal − deal_savings)             │
//! │  delivery_charge = 0 when subtotal ≥ threshold, else flat charge        │
//! │  gateway_fee     = per method fee terms, floored at minimum_fee         │
//! │  grand_total     = subtotal + delivery_charge + gateway_fee             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator is stateless: it must be re-invoked whenever cart
//! contents, validated prices, or the selected payment method change.
//! Deal savings are deliberately recomputed here instead of read from the
//! cart's cached summary, because validated prices may differ from what the
//! summary was last derived from.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::deals::compute_deals;
use crate::types::{FeeTerms, LineItem, PaymentMethodDescriptor};
use crate::{DELIVERY_CHARGE, FREE_DELIVERY_THRESHOLD};

// =============================================================================
// Checkout Policy
// =============================================================================

/// Store-level checkout tunables.
///
/// Defaults carry the storefront's fixed policy: free delivery at 2000 and a
/// flat 150 charge below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPolicy {
    /// Discounted subtotal at or above which delivery is free.
    pub free_delivery_threshold: f64,

    /// Flat delivery charge below the threshold.
    pub delivery_charge: f64,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        CheckoutPolicy {
            free_delivery_threshold: FREE_DELIVERY_THRESHOLD,
            delivery_charge: DELIVERY_CHARGE,
        }
    }
}

impl CheckoutPolicy {
    /// Delivery charge for a discounted subtotal.
    #[inline]
    pub fn delivery_charge_for(&self, subtotal: f64) -> f64 {
        if subtotal >= self.free_delivery_threshold {
            0.0
        } else {
            self.delivery_charge
        }
    }
}

// =============================================================================
// Checkout Totals
// =============================================================================

/// The totals block produced for presentation and order submission.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    /// Σ price × quantity at nominal prices, before deals.
    pub original_subtotal: f64,

    /// Deal Engine savings against the current quantities and prices.
    pub deal_savings: f64,

    /// `original_subtotal − deal_savings`, floored at 0.
    pub subtotal: f64,

    /// Delivery charge per policy threshold.
    pub delivery_charge: f64,

    /// Payment-gateway surcharge for the selected method.
    pub gateway_fee: f64,

    /// `subtotal + delivery_charge + gateway_fee`.
    pub grand_total: f64,
}

/// Computes the gateway surcharge for a payment method.
///
/// ## Rules
/// - No method selected, or a method without fee terms → 0
/// - `Proportional(rate)` → `rate × subtotal`
/// - `Flat(amount)` → `amount`
/// - The computed fee is floored at the method's `minimum_fee`
pub fn gateway_fee(method: Option<&PaymentMethodDescriptor>, subtotal: f64) -> f64 {
    let Some(method) = method else {
        return 0.0;
    };
    let Some(fee) = method.fee else {
        return 0.0;
    };

    let computed = match fee {
        FeeTerms::Proportional(rate) => rate * subtotal,
        FeeTerms::Flat(amount) => amount,
    };

    computed.max(method.minimum_fee.unwrap_or(0.0))
}

/// Computes the full checkout totals block.
///
/// ## Example
/// ```rust
/// use dukaan_core::checkout::{compute_totals, CheckoutPolicy};
/// # use dukaan_core::types::{CatalogProduct, LineItem};
/// # let product: CatalogProduct = serde_json::from_str(
/// #     r#"{"id":"p1","name":"X","price":500.0,"stock":10}"#).unwrap();
/// # let mut item = LineItem::from_product(&product);
/// item.quantity = 3;
///
/// let totals = compute_totals(&[item], None, &CheckoutPolicy::default());
/// assert_eq!(totals.subtotal, 1500.0);
/// assert_eq!(totals.delivery_charge, 150.0);
/// assert_eq!(totals.grand_total, 1650.0);
/// ```
pub fn compute_totals(
    items: &[LineItem],
    method: Option<&PaymentMethodDescriptor>,
    policy: &CheckoutPolicy,
) -> CheckoutTotals {
    let original_subtotal: f64 = items.iter().map(LineItem::nominal_line_total).sum();
    let deal_savings = compute_deals(items).total_savings;
    let subtotal = (original_subtotal - deal_savings).max(0.0);
    let delivery_charge = policy.delivery_charge_for(subtotal);
    let gateway_fee = gateway_fee(method, subtotal);

    CheckoutTotals {
        original_subtotal,
        deal_savings,
        subtotal,
        delivery_charge,
        gateway_fee,
        grand_total: subtotal + delivery_charge + gateway_fee,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CatalogProduct, DealType};

    fn item(id: &str, price: f64, quantity: i64) -> LineItem {
        let product: CatalogProduct = serde_json::from_str(&format!(
            r#"{{"id":"{}","name":"Item {}","price":{},"stock":100}}"#,
            id, id, price
        ))
        .unwrap();
        let mut item = LineItem::from_product(&product);
        item.quantity = quantity;
        item
    }

    fn method(fee: Option<FeeTerms>, minimum_fee: Option<f64>) -> PaymentMethodDescriptor {
        PaymentMethodDescriptor {
            id: "jazzcash".to_string(),
            name: "JazzCash".to_string(),
            enabled: true,
            fee,
            minimum_fee,
        }
    }

    #[test]
    fn test_delivery_charged_below_threshold() {
        let totals = compute_totals(&[item("a", 1999.0, 1)], None, &CheckoutPolicy::default());
        assert_eq!(totals.delivery_charge, 150.0);
        assert_eq!(totals.grand_total, 2149.0);
    }

    #[test]
    fn test_delivery_free_at_threshold() {
        let totals = compute_totals(&[item("a", 2000.0, 1)], None, &CheckoutPolicy::default());
        assert_eq!(totals.delivery_charge, 0.0);
        assert_eq!(totals.grand_total, 2000.0);
    }

    #[test]
    fn test_deal_savings_reduce_subtotal() {
        let mut line = item("a", 100.0, 4);
        line.deal_type = Some(DealType::Bogo);

        let totals = compute_totals(&[line], None, &CheckoutPolicy::default());
        assert_eq!(totals.original_subtotal, 400.0);
        assert_eq!(totals.deal_savings, 200.0);
        assert_eq!(totals.subtotal, 200.0);
    }

    #[test]
    fn test_proportional_fee() {
        let method = method(Some(FeeTerms::Proportional(0.02)), None);
        let totals = compute_totals(
            &[item("a", 1000.0, 1)],
            Some(&method),
            &CheckoutPolicy::default(),
        );
        assert_eq!(totals.gateway_fee, 20.0);
        assert_eq!(totals.grand_total, 1000.0 + 150.0 + 20.0);
    }

    #[test]
    fn test_minimum_fee_floor() {
        let method = method(Some(FeeTerms::Proportional(0.01)), Some(25.0));
        // 1% of 1000 = 10, floored up to the 25 minimum.
        assert_eq!(gateway_fee(Some(&method), 1000.0), 25.0);
    }

    #[test]
    fn test_flat_fee() {
        let method = method(Some(FeeTerms::Flat(50.0)), None);
        assert_eq!(gateway_fee(Some(&method), 10_000.0), 50.0);
    }

    #[test]
    fn test_no_fee_terms_is_free() {
        let method = method(None, Some(25.0));
        assert_eq!(gateway_fee(Some(&method), 1000.0), 0.0);
        assert_eq!(gateway_fee(None, 1000.0), 0.0);
    }

    #[test]
    fn test_empty_cart_totals_are_zero_plus_delivery() {
        let totals = compute_totals(&[], None, &CheckoutPolicy::default());
        assert_eq!(totals.original_subtotal, 0.0);
        assert_eq!(totals.deal_savings, 0.0);
        assert_eq!(totals.subtotal, 0.0);
        // An empty subtotal sits below the threshold; the charge policy is
        // applied uniformly and the caller gates empty carts out of checkout.
        assert_eq!(totals.delivery_charge, 150.0);
    }

    #[test]
    fn test_totals_reflect_multiple_lines() {
        let totals = compute_totals(
            &[item("a", 300.0, 2), item("b", 450.0, 1)],
            None,
            &CheckoutPolicy::default(),
        );
        assert_eq!(totals.original_subtotal, 1050.0);
        assert_eq!(totals.subtotal, 1050.0);
        assert_eq!(totals.grand_total, 1200.0);
    }
}
