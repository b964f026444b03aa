//! # Cart Error Types
//!
//! Errors surfaced by catalog-facing cart operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Catalog failure (CatalogError)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartError (this module) ← classified per operation                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend presents a retryable notification                            │
//! │                                                                         │
//! │  The store is NEVER left partially mutated by a failed operation:      │
//! │  checks run first, the batch write happens only on success.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors from checked cart operations and validation passes.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product was deleted, deactivated, or is otherwise gone.
    #[error("{name} is no longer available")]
    ProductUnavailable { name: String },

    /// The requested quantity exceeds the catalog's current stock.
    #[error("Only {available} {unit} available in stock")]
    InsufficientStock { available: i64, unit: String },

    /// A validation pass failed before it could be applied.
    ///
    /// ## When This Occurs
    /// - The catalog backend errored mid-pass
    /// - Submit-time revalidation could not confirm an item
    ///
    /// The cart state is unchanged; the caller may retry.
    #[error("Failed to validate cart prices: {0}")]
    ValidationFailed(String),

    /// Checkout was attempted against an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Catalog lookup failure outside a validation pass.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;
