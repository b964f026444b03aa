//! # dukaan-core: Pure Pricing Logic for Dukaan
//!
//! This crate is the **heart** of the Dukaan storefront. It contains the
//! cart pricing logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dukaan Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React SPA)                         │   │
//! │  │    Product Grid ──► Cart View ──► Checkout ──► Orders           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    dukaan-cart                                  │   │
//! │  │    CartStore, CartValidator, OrderAssembler, CatalogLookup      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukaan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │   deals   │  │  checkout │  │   │
//! │  │   │ LineItem  │  │ resolver  │  │ BOGO      │  │ delivery  │  │   │
//! │  │   │ DealRecord│  │ hierarchy │  │ Bundle    │  │ gateway   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CATALOG • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogProduct, LineItem, deals, fee terms)
//! - [`pricing`] - Effective-unit-price resolution over the pricing hierarchy
//! - [`deals`] - Promotional deal detection and savings
//! - [`checkout`] - Checkout totals: delivery threshold and gateway fee tiers
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Catalog, network, file system access is FORBIDDEN here
//! 3. **Graceful Degradation**: Bad external data defaults to safe values, never panics
//! 4. **Input-Domain Math**: Prices stay in the catalog's `f64` domain; rounding
//!    for display belongs to the frontend
//!
//! ## Example Usage
//!
//! ```rust
//! use dukaan_core::deals::compute_deals;
//! use dukaan_core::pricing::resolve_price;
//! use dukaan_core::types::{CatalogProduct, DealType, LineItem};
//!
//! let product: CatalogProduct = serde_json::from_str(
//!     r#"{"id":"p1","name":"Lipton Tea","price":100.0,"stock":20}"#,
//! ).unwrap();
//!
//! let mut item = LineItem::from_product(&product);
//! item.quantity = 5;
//! item.deal_type = Some(DealType::Bogo);
//!
//! // Every second unit free: 2 free units at the nominal price.
//! let summary = compute_deals(std::slice::from_ref(&item));
//! assert_eq!(summary.total_savings, 200.0);
//!
//! // No overrides, no seasonal discount: effective price is the flat price.
//! assert_eq!(resolve_price(&item), 100.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod deals;
pub mod error;
pub mod pricing;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use dukaan_core::LineItem` instead of
// `use dukaan_core::types::LineItem`

pub use checkout::{compute_totals, CheckoutPolicy, CheckoutTotals};
pub use deals::{compute_deals, parse_bundle_terms, BundleTerms};
pub use error::{PricingError, PricingResult};
pub use pricing::resolve_price;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Discounted subtotal at or above which delivery is free.
pub const FREE_DELIVERY_THRESHOLD: f64 = 2000.0;

/// Flat delivery charge below [`FREE_DELIVERY_THRESHOLD`].
pub const DELIVERY_CHARGE: f64 = 150.0;

/// Image path substituted when a catalog record carries none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

/// Display unit substituted when a catalog record carries none.
pub const DEFAULT_UNIT: &str = "piece";
