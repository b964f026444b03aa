//! # Deal Engine
//!
//! Detects applicable promotional deals per line item and computes
//! quantity-based savings.
//!
//! ## Recompute-From-Scratch Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every cart mutation                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_deals(items) ──► fresh DealsSummary                            │
//! │                                                                         │
//! │  The summary is NEVER patched incrementally. A line that stops          │
//! │  qualifying simply vanishes from the next summary; stale savings        │
//! │  cannot survive a recompute.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Nominal Price Rule
//! Savings are valued at the item's flat `price`, not the hierarchy-resolved
//! price. Deal math runs on the nominal price before hierarchy stacking.

use crate::error::PricingError;
use crate::types::{DealRecord, DealType, DealsSummary, LineItem};

// =============================================================================
// Bundle Terms
// =============================================================================

/// Parsed `"<buy>for<pay>"` bundle terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleTerms {
    /// Units the customer takes per bundle group.
    pub buy: i64,
    /// Units the customer pays for per bundle group.
    pub pay: i64,
}

impl BundleTerms {
    /// Free units per complete bundle group.
    #[inline]
    pub fn free_per_set(&self) -> i64 {
        self.buy - self.pay
    }
}

/// Parses a bundle encoding like `"3for2"`.
///
/// ## Rules
/// - Whitespace-tolerant on both sides: `" 3 for 2 "` parses
/// - Both sides must be positive integers
/// - `pay >= buy` encodes no savings and is rejected as invalid
///
/// ## Example
/// ```rust
/// use dukaan_core::deals::parse_bundle_terms;
///
/// let terms = parse_bundle_terms("3for2").unwrap();
/// assert_eq!((terms.buy, terms.pay), (3, 2));
/// assert!(parse_bundle_terms("2for5").is_err());
/// assert!(parse_bundle_terms("three for two").is_err());
/// ```
pub fn parse_bundle_terms(encoding: &str) -> Result<BundleTerms, PricingError> {
    let invalid = || PricingError::InvalidDealEncoding {
        encoding: encoding.to_string(),
    };

    let (buy, pay) = encoding.split_once("for").ok_or_else(invalid)?;
    let buy: i64 = buy.trim().parse().map_err(|_| invalid())?;
    let pay: i64 = pay.trim().parse().map_err(|_| invalid())?;

    if buy <= 0 || pay <= 0 || pay >= buy {
        return Err(invalid());
    }

    Ok(BundleTerms { buy, pay })
}

// =============================================================================
// Deal Detection
// =============================================================================

/// Recomputes the full deals summary for the given items.
///
/// ## Per-Deal Rules
/// - **BOGO**: needs `quantity >= 2`; `free = quantity / 2`,
///   `savings = free * price`
/// - **Bundle**: needs `quantity >= 3`, parsable terms, and
///   `quantity >= buy`; `sets = quantity / buy`,
///   `free = sets * (buy - pay)`, `savings = free * price`
///
/// Items below their threshold, or with an unparsable `deal_value`,
/// contribute zero savings and are omitted from `applied_deals`, never an
/// error.
pub fn compute_deals(items: &[LineItem]) -> DealsSummary {
    let mut applied_deals = Vec::new();
    let mut total_savings = 0.0;

    for item in items {
        let Some(deal) = item.deal_type else {
            continue;
        };

        match deal {
            DealType::Bogo if item.quantity >= 2 => {
                let free_items = item.quantity / 2;
                let savings = free_items as f64 * item.price;

                applied_deals.push(DealRecord {
                    id: format!("{}-bogo", item.id),
                    product_id: item.id.clone(),
                    product_name: item.name.clone(),
                    kind: DealType::Bogo,
                    description: "Buy 1 Get 1 Free".to_string(),
                    free_items,
                    savings,
                    applied_quantity: item.quantity,
                    bundle_sets: None,
                });
                total_savings += savings;
            }
            DealType::Bundle if item.quantity >= 3 => {
                let Some(encoding) = item.deal_value.as_deref() else {
                    continue;
                };
                // Invalid encodings are worth zero, not fatal.
                let Ok(terms) = parse_bundle_terms(encoding) else {
                    continue;
                };
                if item.quantity < terms.buy {
                    continue;
                }

                let bundle_sets = item.quantity / terms.buy;
                let free_items = bundle_sets * terms.free_per_set();
                let savings = free_items as f64 * item.price;

                applied_deals.push(DealRecord {
                    id: format!("{}-bundle", item.id),
                    product_id: item.id.clone(),
                    product_name: item.name.clone(),
                    kind: DealType::Bundle,
                    description: format!("{} Deal", encoding),
                    free_items,
                    savings,
                    applied_quantity: item.quantity,
                    bundle_sets: Some(bundle_sets),
                });
                total_savings += savings;
            }
            _ => {}
        }
    }

    DealsSummary {
        total_savings,
        applied_deals,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
