//! colorbal Core - Data structures for color balancing
//!
//! This crate provides the data model shared by the color balancing crates:
//!
//! - [`Band`] / [`BandMut`] - Single-channel raster (immutable / mutable)
//! - [`SampleDepth`] - Native storage depth of a band (8 or 16 bits)
//! - [`Mask`] - Per-pixel validity mask (255 = valid)
//! - [`MultiBandImage`] - Ordered bands of one shape with optional alpha
//! - [`ColorImage`] - Exactly three 8-bit bands in BGR storage order

pub mod band;
pub mod colorimage;
pub mod error;
pub mod mask;
pub mod multiband;

pub use band::{Band, BandMut, SampleDepth};
pub use colorimage::{COLOR_CHANNELS, ColorImage};
pub use error::{Error, Result};
pub use mask::{MASK_INVALID, MASK_VALID, Mask};
pub use multiband::{ALPHA_OPAQUE, MultiBandImage};
