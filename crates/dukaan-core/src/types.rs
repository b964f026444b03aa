//! # Domain Types
//!
//! Core domain types used throughout Dukaan.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ CatalogProduct  │   │    LineItem     │   │   DealRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id (unique)    │──►│  product_id     │       │
//! │  │  price, stock   │   │  price, stock   │   │  free_items     │       │
//! │  │  hierarchy flds │   │  hierarchy flds │   │  savings        │       │
//! │  │  deal flds      │   │  quantity       │   │  bundle_sets?   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountType   │   │    DealType     │   │    FeeTerms     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Percentage     │   │  Bogo ("BOGO")  │   │  Proportional   │       │
//! │  │  FixedAmount    │   │  Bundle         │   │  Flat           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Numeric Domain
//! Monetary values stay in the same `f64` domain the catalog supplies them in.
//! No currency rounding happens inside this crate; presentation rounding is a
//! frontend concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DEFAULT_UNIT, PLACEHOLDER_IMAGE};

// =============================================================================
// Discount Type
// =============================================================================

/// How a seasonal discount is applied to the running effective price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DiscountType {
    /// Multiply by `(1 - discount / 100)`.
    Percentage,
    /// Subtract the discount magnitude, floored at zero.
    ///
    /// The storefront catalog emits this variant as `"Fixed Amount"`.
    #[serde(alias = "Fixed Amount")]
    FixedAmount,
}

impl Default for DiscountType {
    fn default() -> Self {
        DiscountType::FixedAmount
    }
}

// =============================================================================
// Deal Type
// =============================================================================

/// Promotional deal attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DealType {
    /// Buy one get one: every second unit in a qualifying line is free.
    #[serde(rename = "BOGO")]
    Bogo,
    /// Buy N for M: every complete group of N units is billed as M units.
    /// Terms are encoded in `deal_value`, e.g. `"3for2"`.
    Bundle,
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A product record as the external catalog reports it.
///
/// ## Contract
/// This is the shape returned by the Catalog Lookup collaborator. Everything
/// except `id`, `name` and `price` is optional on the wire; missing fields
/// fall back to safe defaults so a sparse catalog record can never poison the
/// cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// Product identifier, unique across the catalog.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Current flat unit price.
    pub price: f64,

    /// Available stock. May arrive negative from a misbehaving backend;
    /// read through [`CatalogProduct::available_stock`] instead.
    #[serde(default)]
    pub stock: i64,

    /// Whether the product can currently be sold (soft delete).
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Pricing hierarchy: base price (source of truth absent overrides).
    #[serde(default)]
    pub base_price: Option<f64>,

    /// Pricing hierarchy: variation override, wins over base when > 0.
    #[serde(default)]
    pub variation_price: Option<f64>,

    /// Pricing hierarchy: seasonal discount magnitude.
    #[serde(default)]
    pub seasonal_discount: f64,

    /// Pricing hierarchy: how the seasonal discount is applied.
    #[serde(default)]
    pub seasonal_discount_type: DiscountType,

    /// Pricing hierarchy: whether the seasonal discount is live.
    #[serde(default)]
    pub seasonal_discount_active: bool,

    /// Display unit ("piece", "kg", "dozen", ...).
    #[serde(default)]
    pub unit: Option<String>,

    /// Product image URL.
    #[serde(default)]
    pub image: Option<String>,

    /// Active promotional deal, if any.
    #[serde(default)]
    pub deal_type: Option<DealType>,

    /// Bundle terms encoding, e.g. `"3for2"`. Required for `Bundle` deals.
    #[serde(default)]
    pub deal_value: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CatalogProduct {
    /// Stock ceiling usable for cart math. Negative stock reported by the
    /// backend degrades to zero rather than propagating.
    #[inline]
    pub fn available_stock(&self) -> i64 {
        self.stock.max(0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product quantity in the cart.
///
/// ## Invariants
/// - `quantity >= 1` while the item is present; a quantity reaching 0 removes
///   the item instead
/// - `quantity <= stock` is enforced by clamping at every mutation
/// - identity is unique by `id`; adding the same product again increments
///   quantity rather than duplicating the line
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product identifier, unique per cart.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Display unit, defaults to `"piece"`.
    pub unit: String,

    /// Image URL, defaults to a placeholder path.
    pub image: String,

    /// Last-known flat unit price. Deal savings math uses this nominal
    /// price, not the hierarchy-resolved one.
    pub price: f64,

    /// Base price (source of truth absent overrides).
    pub base_price: Option<f64>,

    /// Variation override, wins over base when > 0.
    pub variation_price: Option<f64>,

    /// Seasonal discount magnitude, applied last.
    pub seasonal_discount: f64,

    /// How the seasonal discount is applied.
    pub seasonal_discount_type: DiscountType,

    /// Whether the seasonal discount is live.
    pub seasonal_discount_active: bool,

    /// Last-known available stock ceiling.
    pub stock: i64,

    /// Units of this product in the cart.
    pub quantity: i64,

    /// Active promotional deal, if any.
    pub deal_type: Option<DealType>,

    /// Bundle terms encoding, e.g. `"3for2"`.
    pub deal_value: Option<String>,

    /// When the item entered the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,

    /// When the item was last touched.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a new line item (quantity 1) from a catalog product.
    ///
    /// Missing display fields fall back to their defaults: `unit` to
    /// `"piece"`, `image` to the placeholder path, deal fields to none.
    pub fn from_product(product: &CatalogProduct) -> Self {
        let now = Utc::now();
        LineItem {
            id: product.id.clone(),
            name: product.name.clone(),
            unit: product
                .unit
                .clone()
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            image: product
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            price: product.price,
            base_price: product.base_price,
            variation_price: product.variation_price,
            seasonal_discount: product.seasonal_discount,
            seasonal_discount_type: product.seasonal_discount_type,
            seasonal_discount_active: product.seasonal_discount_active,
            stock: product.available_stock(),
            quantity: 1,
            deal_type: product.deal_type,
            deal_value: product.deal_value.clone(),
            added_at: now,
            updated_at: now,
        }
    }

    /// Refreshes price, stock and the pricing-hierarchy fields from a newer
    /// catalog record. Quantity, identity and timestamps are untouched.
    pub fn refresh_from(&mut self, product: &CatalogProduct) {
        self.price = product.price;
        self.stock = product.available_stock();
        self.base_price = product.base_price;
        self.variation_price = product.variation_price;
        self.seasonal_discount = product.seasonal_discount;
        self.seasonal_discount_type = product.seasonal_discount_type;
        self.seasonal_discount_active = product.seasonal_discount_active;
    }

    /// Line total at the nominal (pre-hierarchy) price.
    #[inline]
    pub fn nominal_line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

// =============================================================================
// Deal Records
// =============================================================================

/// One applied deal, derived per qualifying line item.
///
/// Recomputed wholesale on every cart mutation; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    /// Stable record id, `"{product_id}-bogo"` or `"{product_id}-bundle"`.
    pub id: String,

    /// Product this deal applies to.
    pub product_id: String,

    /// Product display name, for presentation.
    pub product_name: String,

    /// Which deal fired.
    #[serde(rename = "type")]
    pub kind: DealType,

    /// Human-readable description ("Buy 1 Get 1 Free", "3for2 Deal").
    pub description: String,

    /// Units the customer is not paying for.
    pub free_items: i64,

    /// Monetary savings at the nominal unit price.
    pub savings: f64,

    /// Quantity the deal was evaluated against.
    pub applied_quantity: i64,

    /// Complete bundle groups, for Bundle deals only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_sets: Option<i64>,
}

/// Aggregate of all applied deals across the cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DealsSummary {
    /// Sum of per-deal savings.
    pub total_savings: f64,

    /// Every deal that fired, in item order.
    pub applied_deals: Vec<DealRecord>,
}

// =============================================================================
// Payment Method Descriptor
// =============================================================================

/// Fee terms of a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum FeeTerms {
    /// Rate multiplied by the discounted subtotal (`0.025` = 2.5%).
    Proportional(f64),
    /// Flat surcharge in currency units.
    Flat(f64),
}

/// A payment method as the payments collaborator describes it.
///
/// Consumed by the checkout totals calculator; this crate never executes
/// payments, it only prices their fee terms.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodDescriptor {
    /// Method identifier ("cash", "jazzcash", "bank", ...).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Whether the method is currently offered.
    pub enabled: bool,

    /// Fee terms; absent means the method carries no surcharge.
    #[serde(default)]
    pub fee: Option<FeeTerms>,

    /// Fee floor in currency units.
    #[serde(default)]
    pub minimum_fee: Option<f64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_type_default() {
        assert_eq!(DiscountType::default(), DiscountType::FixedAmount);
    }

    #[test]
    fn test_discount_type_accepts_legacy_spelling() {
        // The storefront catalog stores the fixed variant with a space.
        let parsed: DiscountType = serde_json::from_str("\"Fixed Amount\"").unwrap();
        assert_eq!(parsed, DiscountType::FixedAmount);

        let parsed: DiscountType = serde_json::from_str("\"Percentage\"").unwrap();
        assert_eq!(parsed, DiscountType::Percentage);
    }

    #[test]
    fn test_deal_type_wire_format() {
        assert_eq!(serde_json::to_string(&DealType::Bogo).unwrap(), "\"BOGO\"");
        assert_eq!(
            serde_json::to_string(&DealType::Bundle).unwrap(),
            "\"Bundle\""
        );
    }

    #[test]
    fn test_catalog_product_sparse_record() {
        // Only id/name/price present; everything else defaults safely.
        let product: CatalogProduct =
            serde_json::from_str(r#"{"id":"p1","name":"Basmati Rice 5kg","price":1450.0}"#)
                .unwrap();

        assert_eq!(product.stock, 0);
        assert!(product.is_active);
        assert_eq!(product.base_price, None);
        assert_eq!(product.seasonal_discount, 0.0);
        assert_eq!(product.seasonal_discount_type, DiscountType::FixedAmount);
        assert!(!product.seasonal_discount_active);
        assert_eq!(product.deal_type, None);
    }

    #[test]
    fn test_available_stock_clamps_negative() {
        let mut product: CatalogProduct =
            serde_json::from_str(r#"{"id":"p1","name":"X","price":10.0}"#).unwrap();
        product.stock = -4;
        assert_eq!(product.available_stock(), 0);

        product.stock = 7;
        assert_eq!(product.available_stock(), 7);
    }

    #[test]
    fn test_line_item_defaults() {
        let product: CatalogProduct =
            serde_json::from_str(r#"{"id":"p1","name":"Eggs","price":330.0,"stock":12}"#).unwrap();
        let item = LineItem::from_product(&product);

        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit, "piece");
        assert_eq!(item.image, crate::PLACEHOLDER_IMAGE);
        assert_eq!(item.stock, 12);
        assert_eq!(item.deal_type, None);
        assert_eq!(item.deal_value, None);
    }

    #[test]
    fn test_refresh_from_keeps_quantity() {
        let product: CatalogProduct =
            serde_json::from_str(r#"{"id":"p1","name":"Eggs","price":330.0,"stock":12}"#).unwrap();
        let mut item = LineItem::from_product(&product);
        item.quantity = 4;

        let mut updated = product.clone();
        updated.price = 350.0;
        updated.stock = 3;
        updated.variation_price = Some(340.0);
        item.refresh_from(&updated);

        assert_eq!(item.price, 350.0);
        assert_eq!(item.stock, 3);
        assert_eq!(item.variation_price, Some(340.0));
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let product: CatalogProduct =
            serde_json::from_str(r#"{"id":"p1","name":"Eggs","price":330.0}"#).unwrap();
        let item = LineItem::from_product(&product);
        let json = serde_json::to_value(&item).unwrap();

        assert!(json.get("basePrice").is_some());
        assert!(json.get("seasonalDiscountActive").is_some());
        assert!(json.get("addedAt").is_some());
    }
}
