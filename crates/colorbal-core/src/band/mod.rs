//! Band - a single-channel intensity raster
//!
//! A `Band` is a width × height array of unsigned samples at a fixed
//! native depth (8 or 16 bits). Multi-band images, color images and the
//! statistics code all operate on bands.
//!
//! # Sample layout
//!
//! - Samples are stored row-major, one `u16` per pixel
//! - Row `y` occupies `data[y * width .. (y + 1) * width]`
//! - Every sample is at most `depth.max_value()`
//!
//! # Ownership model
//!
//! `Band` uses `Arc` for cheap cloning (shared ownership). Bands handed to
//! the balancing code are never modified; to change samples, convert to
//! `BandMut` via [`Band::try_into_mut`] or [`Band::to_mut`], then convert
//! back with `Into<Band>`.

mod access;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Sample depth (bits per sample)
///
/// The native storage width of a band. Declared bit depths used during
/// conversion (e.g. 12-bit data in a 16-bit container) are a separate,
/// caller-supplied value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SampleDepth {
    /// 8-bit samples (256 levels)
    Bit8 = 8,
    /// 16-bit samples (65536 levels)
    Bit16 = 16,
}

impl SampleDepth {
    /// Create `SampleDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 8 or 16.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(SampleDepth::Bit8),
            16 => Ok(SampleDepth::Bit16),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per sample.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Get the maximum sample value representable at this depth.
    pub fn max_value(self) -> u32 {
        (1u32 << self.bits()) - 1
    }

    /// Number of distinct intensity levels (histogram / LUT length).
    pub fn levels(self) -> usize {
        1usize << self.bits()
    }
}

/// Internal band data
#[derive(Debug, Clone, PartialEq, Eq)]
struct BandData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Native sample depth
    depth: SampleDepth,
    /// Row-major samples
    data: Vec<u16>,
}

/// Band - immutable single-channel raster
///
/// # Examples
///
/// ```
/// use colorbal_core::{Band, SampleDepth};
///
/// let band = Band::new_filled(4, 3, SampleDepth::Bit8, 7).unwrap();
/// assert_eq!(band.width(), 4);
/// assert_eq!(band.get(3, 2), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    inner: Arc<BandData>,
}

impl Band {
    /// Create a new zero-filled band.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: SampleDepth) -> Result<Self> {
        Self::new_filled(width, height, depth, 0)
    }

    /// Create a band with every sample set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or
    /// [`Error::SampleOutOfRange`] if `value` does not fit `depth`.
    pub fn new_filled(width: u32, height: u32, depth: SampleDepth, value: u16) -> Result<Self> {
        check_dimensions(width, height)?;
        check_sample(value, depth)?;
        let data = vec![value; width as usize * height as usize];
        Ok(Self::from_parts(width, height, depth, data))
    }

    /// Create a band from row-major samples.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if width or height is 0
    /// - [`Error::BufferLength`] if `data.len() != width * height`
    /// - [`Error::SampleOutOfRange`] if any sample exceeds `depth`
    pub fn from_vec(width: u32, height: u32, depth: SampleDepth, data: Vec<u16>) -> Result<Self> {
        check_dimensions(width, height)?;
        if data.len() != width as usize * height as usize {
            return Err(Error::BufferLength {
                width,
                height,
                actual: data.len(),
            });
        }
        if depth == SampleDepth::Bit8
            && let Some(&v) = data.iter().find(|&&v| u32::from(v) > depth.max_value())
        {
            return Err(Error::SampleOutOfRange {
                value: u32::from(v),
                depth: depth.bits(),
            });
        }
        Ok(Self::from_parts(width, height, depth, data))
    }

    /// Create an 8-bit band from row-major bytes.
    pub fn from_u8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let samples = data.iter().map(|&v| u16::from(v)).collect();
        Self::from_vec(width, height, SampleDepth::Bit8, samples)
    }

    fn from_parts(width: u32, height: u32, depth: SampleDepth, data: Vec<u16>) -> Self {
        Band {
            inner: Arc::new(BandData {
                width,
                height,
                depth,
                data,
            }),
        }
    }

    /// Get the band width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the band height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get the native sample depth.
    #[inline]
    pub fn depth(&self) -> SampleDepth {
        self.inner.depth
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.data.len()
    }

    /// Get the row-major samples.
    #[inline]
    pub fn data(&self) -> &[u16] {
        &self.inner.data
    }

    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u16] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &self.inner.data[start..start + w]
    }

    /// Get the number of strong references to this band.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if two bands have the same width, height, and depth.
    pub fn sizes_equal(&self, other: &Band) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Fail with [`Error::DimensionMismatch`] unless the band is `width × height`.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if self.dimensions() != (width, height) {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: self.dimensions(),
            });
        }
        Ok(())
    }

    /// Largest sample value in the band.
    pub fn max_sample(&self) -> u16 {
        self.inner.data.iter().copied().max().unwrap_or(0)
    }

    /// Create a zero-filled band with the same shape and depth.
    pub fn create_template(&self) -> Self {
        Self::from_parts(
            self.inner.width,
            self.inner.height,
            self.inner.depth,
            vec![0; self.inner.data.len()],
        )
    }

    /// Try to get mutable access without copying.
    ///
    /// Succeeds only if this is the sole reference; otherwise the band is
    /// handed back unchanged.
    pub fn try_into_mut(self) -> std::result::Result<BandMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(BandMut { inner: data }),
            Err(arc) => Err(Band { inner: arc }),
        }
    }

    /// Create a mutable copy of this band.
    pub fn to_mut(&self) -> BandMut {
        BandMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable band
///
/// Obtained from [`Band::try_into_mut`] or [`Band::to_mut`]; converted back
/// with `Into<Band>`.
#[derive(Debug)]
pub struct BandMut {
    inner: BandData,
}

impl BandMut {
    /// Get the band width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the band height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the native sample depth.
    #[inline]
    pub fn depth(&self) -> SampleDepth {
        self.inner.depth
    }

    /// Get the row-major samples.
    #[inline]
    pub fn data(&self) -> &[u16] {
        &self.inner.data
    }

    /// Fill every sample with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleOutOfRange`] if `value` does not fit the depth.
    pub fn fill(&mut self, value: u16) -> Result<()> {
        check_sample(value, self.inner.depth)?;
        self.inner.data.fill(value);
        Ok(())
    }
}

impl From<BandMut> for Band {
    fn from(band_mut: BandMut) -> Self {
        Band {
            inner: Arc::new(band_mut.inner),
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    Ok(())
}

#[inline]
fn check_sample(value: u16, depth: SampleDepth) -> Result<()> {
    if u32::from(value) > depth.max_value() {
        return Err(Error::SampleOutOfRange {
            value: u32::from(value),
            depth: depth.bits(),
        });
    }
    Ok(())
}
