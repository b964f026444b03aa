//! # Error Types
//!
//! Domain error types for dukaan-core.
//!
//! The pure calculators in this crate never fail: anomalous input degrades
//! to safe values. The one typed failure, an unparsable bundle encoding, is
//! surfaced for callers that parse deal terms directly; the Deal Engine
//! itself swallows it as zero savings.

use thiserror::Error;

/// Pricing-domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Bundle deal terms could not be parsed.
    ///
    /// ## When This Occurs
    /// - `deal_value` is not of the form `"<buy>for<pay>"`
    /// - Either side is missing, non-numeric, or not positive
    /// - `pay >= buy`, which would encode zero or negative savings
    #[error("invalid deal encoding '{encoding}': expected \"<buy>for<pay>\" with pay < buy")]
    InvalidDealEncoding { encoding: String },
}

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;
