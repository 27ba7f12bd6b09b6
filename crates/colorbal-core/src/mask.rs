//! Validity masks
//!
//! A `Mask` marks which pixels of a band take part in statistics.
//! A sample of [`MASK_VALID`] (255) means valid; every other value,
//! normally [`MASK_INVALID`] (0), excludes the pixel.
//!
//! Functions that accept an optional mask turn `None` into an explicit
//! all-valid mask once, at the API boundary, via [`Mask::resolve`].

use crate::error::{Error, Result};
use std::borrow::Cow;

/// Mask value for a valid pixel
pub const MASK_VALID: u8 = 255;

/// Mask value for an excluded pixel
pub const MASK_INVALID: u8 = 0;

/// Per-pixel validity mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Create a mask with every pixel valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn all_valid(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Mask {
            width,
            height,
            data: vec![MASK_VALID; width as usize * height as usize],
        })
    }

    /// Create a mask from row-major values.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if width or height is 0
    /// - [`Error::BufferLength`] if `data.len() != width * height`
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if data.len() != width as usize * height as usize {
            return Err(Error::BufferLength {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Mask {
            width,
            height,
            data,
        })
    }

    /// Turn an optional mask into a concrete one for a `width × height` band.
    ///
    /// A supplied mask is borrowed after its shape is checked; `None` becomes
    /// an owned all-valid mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the supplied mask has a
    /// different shape.
    pub fn resolve(mask: Option<&Mask>, width: u32, height: u32) -> Result<Cow<'_, Mask>> {
        match mask {
            Some(m) => {
                m.check_dimensions(width, height)?;
                Ok(Cow::Borrowed(m))
            }
            None => Ok(Cow::Owned(Mask::all_valid(width, height)?)),
        }
    }

    /// Get the mask width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the mask height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the row-major mask values.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the mask value at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Whether the pixel at linear index `idx` is valid.
    #[inline]
    pub fn is_valid_index(&self, idx: usize) -> bool {
        self.data[idx] == MASK_VALID
    }

    /// Whether the pixel at (x, y) is valid. Out-of-bounds pixels are not.
    pub fn is_valid_at(&self, x: u32, y: u32) -> bool {
        self.get(x, y) == Some(MASK_VALID)
    }

    /// Set the mask value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        self.data[y as usize * self.width as usize + x as usize] = value;
        Ok(())
    }

    /// Mark the pixel at (x, y) invalid.
    pub fn invalidate(&mut self, x: u32, y: u32) -> Result<()> {
        self.set(x, y, MASK_INVALID)
    }

    /// Mark the pixel at linear index `idx` invalid.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the mask.
    #[inline]
    pub fn invalidate_index(&mut self, idx: usize) {
        self.data[idx] = MASK_INVALID;
    }

    /// Number of valid pixels.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == MASK_VALID).count()
    }

    /// Fail with [`Error::DimensionMismatch`] unless the mask is `width × height`.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if self.dimensions() != (width, height) {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: self.dimensions(),
            });
        }
        Ok(())
    }

    /// Combine two masks: a pixel is valid only where both are valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the shapes differ.
    pub fn intersect(&self, other: &Mask) -> Result<Mask> {
        other.check_dimensions(self.width, self.height)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| {
                if a == MASK_VALID && b == MASK_VALID {
                    MASK_VALID
                } else {
                    MASK_INVALID
                }
            })
            .collect();
        Ok(Mask {
            width: self.width,
            height: self.height,
            data,
        })
    }
}
