//! # Pricing Resolver
//!
//! Resolves one line item's effective unit price from its three-tier
//! hierarchy: base price, then variation override, then seasonal discount.
//! Pure function; anomalous inputs degrade to safe values instead of failing.

use crate::types::{DiscountType, LineItem};

/// Computes the effective unit price for a line item.
///
/// ## Resolution Order
/// Each stage overrides the previous only when eligible:
/// 1. Start with `base_price`; a missing or non-positive base falls back to
///    the item's flat `price`.
/// 2. A `variation_price` that is present and > 0 replaces the running price.
/// 3. An active seasonal discount with magnitude > 0 is applied last:
///    percentage discounts multiply by `(1 - discount / 100)`, fixed
///    discounts subtract and floor at 0.
///
/// The result is never negative.
///
/// ## Example
/// ```rust
/// use dukaan_core::pricing::resolve_price;
/// # use dukaan_core::types::{CatalogProduct, DiscountType, LineItem};
/// # let product: CatalogProduct = serde_json::from_str(
/// #     r#"{"id":"p1","name":"X","price":100.0}"#).unwrap();
/// # let mut item = LineItem::from_product(&product);
/// item.base_price = Some(100.0);
/// item.variation_price = Some(80.0);
/// item.seasonal_discount = 10.0;
/// item.seasonal_discount_type = DiscountType::Percentage;
/// item.seasonal_discount_active = true;
///
/// // 100 -> variation 80 -> 10% off -> 72
/// assert_eq!(resolve_price(&item), 72.0);
/// ```
pub fn resolve_price(item: &LineItem) -> f64 {
    let mut effective = match item.base_price {
        Some(base) if base > 0.0 => base,
        _ => item.price,
    };

    if let Some(variation) = item.variation_price {
        if variation > 0.0 {
            effective = variation;
        }
    }

    if item.seasonal_discount_active && item.seasonal_discount > 0.0 {
        effective = match item.seasonal_discount_type {
            DiscountType::Percentage => effective * (1.0 - item.seasonal_discount / 100.0),
            DiscountType::FixedAmount => effective - item.seasonal_discount,
        };
    }

    effective.max(0.0)
}
