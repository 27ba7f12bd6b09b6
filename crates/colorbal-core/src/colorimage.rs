//! Three-band 8-bit color images
//!
//! A `ColorImage` holds exactly three 8-bit bands of one shape. Channels are
//! stored in reverse selection order: for a caller selection
//! `(band0, band1, band2)`, usually (R, G, B), channel 0 holds `band2`,
//! channel 1 holds `band1` and channel 2 holds `band0` (BGR storage).

use crate::band::{Band, SampleDepth};
use crate::error::{Error, Result};
use crate::mask::{MASK_INVALID, MASK_VALID, Mask};
use crate::multiband::MultiBandImage;

/// Number of channels in a color image
pub const COLOR_CHANNELS: usize = 3;

/// Three 8-bit bands in storage (BGR) order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    channels: [Band; COLOR_CHANNELS],
}

impl ColorImage {
    /// Create a color image from bands already in storage order.
    ///
    /// # Errors
    ///
    /// - [`Error::IncompatibleDepths`] if any band is not 8-bit
    /// - [`Error::DimensionMismatch`] if the bands differ in shape
    pub fn new(channels: [Band; COLOR_CHANNELS]) -> Result<Self> {
        let (w, h) = channels[0].dimensions();
        for band in &channels {
            if band.depth() != SampleDepth::Bit8 {
                return Err(Error::IncompatibleDepths(
                    band.depth().bits(),
                    SampleDepth::Bit8.bits(),
                ));
            }
            band.check_dimensions(w, h)?;
        }
        Ok(ColorImage { channels })
    }

    /// Create a color image from bands in selection (RGB) order.
    ///
    /// The bands are reversed into storage order.
    pub fn from_selection_order(selected: [Band; COLOR_CHANNELS]) -> Result<Self> {
        let [c0, c1, c2] = selected;
        Self::new([c2, c1, c0])
    }

    /// Channel `index` in storage order.
    #[inline]
    pub fn channel(&self, index: usize) -> Option<&Band> {
        self.channels.get(index)
    }

    /// All channels in storage order.
    #[inline]
    pub fn channels(&self) -> &[Band; COLOR_CHANNELS] {
        &self.channels
    }

    /// Consume the image, returning its channels in storage order.
    pub fn into_channels(self) -> [Band; COLOR_CHANNELS] {
        self.channels
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.channels[0].width()
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.channels[0].height()
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.channels[0].dimensions()
    }

    /// Convert back to a multi-band image in selection order.
    ///
    /// When a mask is given it becomes an 8-bit alpha band: valid pixels are
    /// opaque (255) and every invalid value, not only 0, becomes transparent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the mask shape differs.
    pub fn to_multiband(&self, mask: Option<&Mask>) -> Result<MultiBandImage> {
        let [c0, c1, c2] = &self.channels;
        let bands = vec![c2.clone(), c1.clone(), c0.clone()];
        match mask {
            Some(m) => {
                let (w, h) = self.dimensions();
                m.check_dimensions(w, h)?;
                let opacity: Vec<u8> = m
                    .data()
                    .iter()
                    .map(|&v| if v == MASK_VALID { MASK_VALID } else { MASK_INVALID })
                    .collect();
                let alpha = Band::from_u8(w, h, &opacity)?;
                MultiBandImage::with_alpha(bands, alpha)
            }
            None => MultiBandImage::new(bands),
        }
    }
}
