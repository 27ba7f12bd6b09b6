//! Error types for colorbal-core
//!
//! Provides a unified error type for the data model. Each variant captures
//! enough context for diagnostics without exposing internal details.

use thiserror::Error;

/// colorbal-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid band dimensions
    #[error("invalid band dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid sample depth
    #[error("invalid sample depth: {0} bits")]
    InvalidDepth(u32),

    /// Incompatible sample depths
    #[error("incompatible sample depths: {0} bits vs {1} bits")]
    IncompatibleDepths(u32, u32),

    /// Band or mask dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Sample value does not fit the declared depth
    #[error("sample value {value} exceeds {depth}-bit range")]
    SampleOutOfRange { value: u32, depth: u32 },

    /// Buffer length does not match the declared shape
    #[error("buffer length {actual} does not match {width}x{height}")]
    BufferLength {
        width: u32,
        height: u32,
        actual: usize,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for colorbal-core operations
pub type Result<T> = std::result::Result<T, Error>;
