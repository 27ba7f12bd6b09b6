//! Multi-band source images
//!
//! A `MultiBandImage` is an ordered list of bands sharing one shape and
//! depth (e.g. the blue, green, red and near-infrared planes of a satellite
//! scene), plus an optional alpha band. An alpha sample of 0 marks a
//! transparent (no-data) pixel; any other value is opaque.

use crate::band::{Band, SampleDepth};
use crate::error::{Error, Result};

/// Opaque value used by [`MultiBandImage::create_alpha`]
pub const ALPHA_OPAQUE: u16 = 255;

/// Ordered bands of equal shape plus an optional alpha band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiBandImage {
    bands: Vec<Band>,
    alpha: Option<Band>,
}

impl MultiBandImage {
    /// Create an image from bands, without alpha.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `bands` is empty
    /// - [`Error::DimensionMismatch`] if the bands differ in shape
    /// - [`Error::IncompatibleDepths`] if the bands differ in depth
    pub fn new(bands: Vec<Band>) -> Result<Self> {
        let first = bands
            .first()
            .ok_or_else(|| Error::InvalidParameter("image needs at least one band".into()))?;
        let (w, h) = first.dimensions();
        let depth = first.depth();
        for band in &bands[1..] {
            band.check_dimensions(w, h)?;
            if band.depth() != depth {
                return Err(Error::IncompatibleDepths(depth.bits(), band.depth().bits()));
            }
        }
        Ok(MultiBandImage { bands, alpha: None })
    }

    /// Create an image from bands and an alpha band.
    pub fn with_alpha(bands: Vec<Band>, alpha: Band) -> Result<Self> {
        let mut image = Self::new(bands)?;
        image.set_alpha(alpha)?;
        Ok(image)
    }

    /// Number of bands (alpha excluded).
    #[inline]
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// All bands, in storage order.
    #[inline]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Band `index`, or `None` if out of range.
    #[inline]
    pub fn band(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.bands[0].width()
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bands[0].height()
    }

    /// Native sample depth shared by all bands.
    #[inline]
    pub fn depth(&self) -> SampleDepth {
        self.bands[0].depth()
    }

    /// The alpha band, if any.
    #[inline]
    pub fn alpha(&self) -> Option<&Band> {
        self.alpha.as_ref()
    }

    /// Attach an alpha band.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the alpha band has a
    /// different shape from the image bands.
    pub fn set_alpha(&mut self, alpha: Band) -> Result<()> {
        alpha.check_dimensions(self.width(), self.height())?;
        self.alpha = Some(alpha);
        Ok(())
    }

    /// Remove and return the alpha band.
    pub fn clear_alpha(&mut self) -> Option<Band> {
        self.alpha.take()
    }

    /// Materialize a fully opaque 8-bit alpha band, replacing any existing one.
    pub fn create_alpha(&mut self) -> Result<&Band> {
        let alpha = Band::new_filled(
            self.width(),
            self.height(),
            SampleDepth::Bit8,
            ALPHA_OPAQUE,
        )?;
        Ok(self.alpha.insert(alpha))
    }

    /// Split into bands and optional alpha.
    pub fn into_parts(self) -> (Vec<Band>, Option<Band>) {
        (self.bands, self.alpha)
    }
}
