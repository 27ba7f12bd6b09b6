//! colorbal-match - Histogram matching for color balancing
//!
//! This crate provides the numerical side of color balancing:
//!
//! - Masked histograms, CDFs and mean / standard deviation
//! - LUT builders (CDF matching, mean/std matching, linear scale/offset)
//! - LUT application to bands and color images
//! - Conversion of multi-band imagery into 8-bit color images with a
//!   validity mask
//! - A histogram matching driver with pluggable LUT strategies

pub mod apply;
pub mod colorimage;
mod error;
pub mod histmatch;
pub mod lut;
pub mod stats;

pub use error::{BalanceError, BalanceResult};

// Re-export commonly used items
pub use apply::{apply_lut, apply_luts};
pub use colorimage::{
    ConvertOptions, CurveOutput, DEFAULT_BAND_INDICES, ToneCurve, convert_to_colorimage,
};
pub use histmatch::{LutStrategy, MatchMethod, PerBand, match_histogram};
pub use lut::{
    Lut, MAX_LUT_LEN, cdf_match_lut, cdf_normalization_lut, cdf_normalization_luts, mean_std_lut,
    mean_std_luts, scale_offset_lut,
};
pub use stats::{BandStats, Cdf, Histogram, get_cdf, get_histogram, histogram_mean_std, mean_std};
