//! colorbal - Color balancing for Rust
//!
//! Balances the colors of a source image against a reference image by
//! matching their per-channel intensity distributions.
//!
//! # Overview
//!
//! - Multi-band images of 8 or 16 bits with optional alpha
//! - Conversion to 8-bit three-channel color images with a validity mask
//! - Masked histograms, CDFs and mean / standard deviation
//! - CDF normalization and mean/std matching LUTs
//! - PNG and TIFF input and output
//!
//! # Example
//!
//! ```
//! use colorbal::balance::{MatchMethod, match_histogram};
//! use colorbal::{Band, ColorImage};
//!
//! let ramp: Vec<u8> = (0..=255).collect();
//! let dark: Vec<u8> = ramp.iter().map(|v| v / 2).collect();
//! let band = |data: &[u8]| Band::from_u8(256, 1, data).unwrap();
//!
//! let source = ColorImage::new([band(&dark), band(&dark), band(&dark)]).unwrap();
//! let reference = ColorImage::new([band(&ramp), band(&ramp), band(&ramp)]).unwrap();
//!
//! let balanced =
//!     match_histogram(&MatchMethod::CdfNormalization, &source, &reference, None, None)
//!         .unwrap();
//! assert_eq!(balanced.dimensions(), (256, 1));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use colorbal_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use colorbal_io as io;
pub use colorbal_match as balance;
