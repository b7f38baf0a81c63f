// ============================================================================
// Market Errors
// Programmer-error conditions, reported through Result rather than panics
// ============================================================================

use thiserror::Error;

/// Errors raised for invalid calls into the market.
///
/// Business outcomes of settlement (a buyer that cannot pay, a seller that
/// cannot deliver) are not errors; they are reported through the result
/// enums in [`crate::transfer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// An argument was outside its permitted range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two values denominated in different currencies were combined
    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    /// A market configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MarketError {
    /// True for every variant that signals a bad argument at the call site
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            MarketError::InvalidArgument(_) | MarketError::CurrencyMismatch { .. }
        )
    }
}

/// Result type alias for market operations
pub type MarketResult<T> = Result<T, MarketError>;
