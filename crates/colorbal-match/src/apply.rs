//! Applying lookup tables to bands

use crate::lut::Lut;
use crate::{BalanceError, BalanceResult};
use colorbal_core::{Band, COLOR_CHANNELS, ColorImage};

/// Map every sample of a band through a LUT.
///
/// The output band has the input's shape and depth, and sample `v` becomes
/// `lut[v]`.
///
/// # Arguments
///
/// * `band` - Band to transform
/// * `lut` - Table with at least one entry per intensity level of the band
///
/// # Errors
///
/// Returns [`BalanceError::LutMismatch`] if the LUT is shorter than the
/// band's level count or has entries above the band's maximum value.
///
/// # Example
///
/// ```
/// use colorbal_core::Band;
/// use colorbal_match::{Lut, apply_lut};
///
/// let band = Band::from_u8(3, 1, &[0, 1, 2]).unwrap();
/// let lut = Lut::constant(256, 7);
/// let out = apply_lut(&band, &lut).unwrap();
/// assert!(out.data().iter().all(|&v| v == 7));
/// ```
pub fn apply_lut(band: &Band, lut: &Lut) -> BalanceResult<Band> {
    let depth = band.depth();
    if lut.len() < depth.levels() {
        return Err(BalanceError::LutMismatch(format!(
            "LUT has {} entries, {}-bit band needs {}",
            lut.len(),
            depth.bits(),
            depth.levels()
        )));
    }
    if u32::from(lut.max_entry()) > depth.max_value() {
        return Err(BalanceError::LutMismatch(format!(
            "LUT entry {} exceeds {}-bit range",
            lut.max_entry(),
            depth.bits()
        )));
    }

    let table = lut.entries();
    let data = band.data().iter().map(|&v| table[v as usize]).collect();
    Ok(Band::from_vec(band.width(), band.height(), depth, data)?)
}

/// Apply one LUT per channel, pairing `luts[i]` with channel `i` in storage
/// order.
pub fn apply_luts(image: &ColorImage, luts: &[Lut; COLOR_CHANNELS]) -> BalanceResult<ColorImage> {
    let [c0, c1, c2] = image.channels();
    let channels = [
        apply_lut(c0, &luts[0])?,
        apply_lut(c1, &luts[1])?,
        apply_lut(c2, &luts[2])?,
    ];
    Ok(ColorImage::new(channels)?)
}
