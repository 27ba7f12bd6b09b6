//! Error types for colorbal-match

use thiserror::Error;

/// Errors that can occur while computing statistics, LUTs or conversions
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] colorbal_core::Error),

    /// The image does not have the properties an operation requires
    /// (band count, band selection, curve output)
    #[error("image property violation: {0}")]
    ImageProperty(String),

    /// A lookup table does not fit the band it is applied to
    #[error("lookup table mismatch: {0}")]
    LutMismatch(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for balancing operations
pub type BalanceResult<T> = Result<T, BalanceError>;
