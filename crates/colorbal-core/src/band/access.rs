//! Sample access functions
//!
//! Bounds-checked and unchecked getters/setters for individual samples.

use super::{Band, BandMut, check_sample};
use crate::error::{Error, Result};

impl Band {
    /// Get the sample at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.get_unchecked(x, y))
    }

    /// Get the sample at (x, y) without bounds checking against the width.
    ///
    /// # Panics
    ///
    /// Panics if the linear index falls outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u16 {
        self.inner.data[y as usize * self.inner.width as usize + x as usize]
    }
}

impl BandMut {
    /// Get the sample at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.get_unchecked(x, y))
    }

    /// Get the sample at (x, y) without bounds checking against the width.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u16 {
        self.inner.data[y as usize * self.inner.width as usize + x as usize]
    }

    /// Set the sample at (x, y).
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// - [`Error::SampleOutOfRange`] if `val` does not fit the depth
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u16) -> Result<()> {
        if x >= self.inner.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.inner.width as usize,
            });
        }
        if y >= self.inner.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.inner.height as usize,
            });
        }
        check_sample(val, self.inner.depth)?;
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set the sample at (x, y) without bounds or range checking.
    ///
    /// The caller guarantees `val` fits the band depth.
    ///
    /// # Panics
    ///
    /// Panics if the linear index falls outside the buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u16) {
        let w = self.inner.width as usize;
        self.inner.data[y as usize * w + x as usize] = val;
    }
}
