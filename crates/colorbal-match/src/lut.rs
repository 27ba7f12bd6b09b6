//! Lookup tables and LUT builders
//!
//! A [`Lut`] maps every input intensity of a band to an output intensity.
//! This module builds them three ways:
//!
//! - **CDF matching** ([`cdf_match_lut`], [`cdf_normalization_lut`]):
//!   align the cumulative distribution of a source band to a reference
//! - **Linear scale/offset** ([`scale_offset_lut`]): rescale an existing
//!   table with hard clipping
//! - **Mean/std matching** ([`mean_std_lut`]): a scale/offset that aligns
//!   the mean and spread of a source band with a reference
//!
//! The `*_luts` variants compute one table per channel of a [`ColorImage`]
//! and have the shape expected by [`crate::LutStrategy`].

use crate::stats::{Cdf, get_cdf, mean_std};
use crate::{BalanceError, BalanceResult};
use colorbal_core::{Band, COLOR_CHANNELS, ColorImage, Mask};
use log::{debug, warn};

/// Largest supported LUT length (16-bit input range)
pub const MAX_LUT_LEN: usize = 1 << 16;

/// Intensity lookup table
///
/// Entry `i` is the output intensity for input intensity `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    entries: Vec<u16>,
}

impl Lut {
    /// Identity table of length `len` (`lut[i] == i`).
    ///
    /// Entries past [`MAX_LUT_LEN`] saturate at `u16::MAX`.
    pub fn identity(len: usize) -> Self {
        Lut {
            entries: (0..len)
                .map(|i| u16::try_from(i).unwrap_or(u16::MAX))
                .collect(),
        }
    }

    /// Table of length `len` mapping every input to `value`.
    pub fn constant(len: usize, value: u16) -> Self {
        Lut {
            entries: vec![value; len],
        }
    }

    /// Create a table from raw entries.
    pub fn from_vec(entries: Vec<u16>) -> Self {
        Lut { entries }
    }

    /// Create a table from 8-bit entries.
    pub fn from_u8(entries: &[u8]) -> Self {
        Lut {
            entries: entries.iter().map(|&v| u16::from(v)).collect(),
        }
    }

    /// Table entries indexed by input intensity.
    #[inline]
    pub fn entries(&self) -> &[u16] {
        &self.entries
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for input `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u16> {
        self.entries.get(index).copied()
    }

    /// Largest output value, 0 for an empty table.
    pub fn max_entry(&self) -> u16 {
        self.entries.iter().copied().max().unwrap_or(0)
    }

    /// Whether entries never decrease with increasing input.
    pub fn is_monotonic(&self) -> bool {
        self.entries.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Build a LUT that maps source CDF levels onto reference CDF levels.
///
/// For each source intensity `i` the output is the smallest reference
/// intensity `j` with `reference[j] >= source[i]`, scanning `j` upward.
/// If no reference entry reaches `source[i]`, the last reference index is
/// used. The result has the source CDF's length and is non-decreasing
/// because both CDFs are.
///
/// # Errors
///
/// Returns [`BalanceError::InvalidParameters`] if either CDF is empty or the
/// reference is longer than [`MAX_LUT_LEN`].
pub fn cdf_match_lut(source: &Cdf, reference: &Cdf) -> BalanceResult<Lut> {
    if source.is_empty() || reference.is_empty() {
        return Err(BalanceError::InvalidParameters(
            "CDFs must not be empty".into(),
        ));
    }
    if reference.len() > MAX_LUT_LEN {
        return Err(BalanceError::InvalidParameters(format!(
            "reference CDF length {} exceeds {}",
            reference.len(),
            MAX_LUT_LEN
        )));
    }

    let ref_values = reference.values();
    let last = ref_values.len() - 1;
    let entries = source
        .values()
        .iter()
        .map(|&s| ref_values.partition_point(|&r| r < s).min(last) as u16)
        .collect();

    Ok(Lut { entries })
}

/// Rescale a LUT's outputs linearly, clipping to the table's own range.
///
/// Entry `i` becomes `scale * lut[i] + offset`, clipped to
/// `[0, len - 1]` and truncated toward zero. `scale = 1, offset = 0`
/// returns the table unchanged; a positive offset saturates the high end at
/// `len - 1` and a negative offset saturates the low end at 0.
///
/// # Errors
///
/// Returns [`BalanceError::InvalidParameters`] if `scale` or `offset` is
/// not finite, or the table is empty.
///
/// # Example
///
/// ```
/// use colorbal_match::{Lut, scale_offset_lut};
///
/// let lut = Lut::identity(10);
/// let shifted = scale_offset_lut(&lut, 1.0, 5.0).unwrap();
/// assert_eq!(shifted.entries(), &[5, 6, 7, 8, 9, 9, 9, 9, 9, 9]);
/// ```
pub fn scale_offset_lut(lut: &Lut, scale: f64, offset: f64) -> BalanceResult<Lut> {
    if !scale.is_finite() || !offset.is_finite() {
        return Err(BalanceError::InvalidParameters(format!(
            "scale ({scale}) and offset ({offset}) must be finite"
        )));
    }
    if lut.is_empty() {
        return Err(BalanceError::InvalidParameters("LUT must not be empty".into()));
    }

    let max_val = (lut.len() - 1) as f64;
    let entries = lut
        .entries()
        .iter()
        .map(|&v| (scale * f64::from(v) + offset).clamp(0.0, max_val) as u16)
        .collect();

    Ok(Lut { entries })
}

/// Build a mean / standard deviation matching LUT for one band.
///
/// With `scale = ref_std / src_std` and `offset = ref_mean - scale *
/// src_mean`, the identity table is passed through [`scale_offset_lut`],
/// so source intensities keep their ordering while mean and spread move to
/// the reference's.
///
/// Degenerate statistics do not fail:
/// - no valid pixel in either band: identity LUT
/// - zero source spread: scale 1, i.e. a pure mean shift
///
/// # Errors
///
/// - core `IncompatibleDepths` if the bands differ in depth
/// - core `DimensionMismatch` if a mask does not fit its band
pub fn mean_std_lut(
    source: &Band,
    reference: &Band,
    source_mask: Option<&Mask>,
    reference_mask: Option<&Mask>,
) -> BalanceResult<Lut> {
    check_same_depth(source, reference)?;
    let identity = Lut::identity(source.depth().levels());

    let (Some(src), Some(refs)) = (
        mean_std(source, source_mask)?,
        mean_std(reference, reference_mask)?,
    ) else {
        warn!("mean/std match: no valid pixels, using identity LUT");
        return Ok(identity);
    };

    let scale = if src.std_dev == 0.0 {
        1.0
    } else {
        refs.std_dev / src.std_dev
    };
    let offset = refs.mean - scale * src.mean;
    debug!(
        "mean/std match: src mean {:.3} std {:.3}, ref mean {:.3} std {:.3} -> scale {:.5} offset {:.3}",
        src.mean, src.std_dev, refs.mean, refs.std_dev, scale, offset
    );

    scale_offset_lut(&identity, scale, offset)
}

/// Build a CDF matching LUT for one band.
///
/// Returns the identity LUT when either band has no valid pixels.
///
/// # Errors
///
/// - core `IncompatibleDepths` if the bands differ in depth
/// - core `DimensionMismatch` if a mask does not fit its band
pub fn cdf_normalization_lut(
    source: &Band,
    reference: &Band,
    source_mask: Option<&Mask>,
    reference_mask: Option<&Mask>,
) -> BalanceResult<Lut> {
    check_same_depth(source, reference)?;
    let src_cdf = get_cdf(source, source_mask)?;
    let ref_cdf = get_cdf(reference, reference_mask)?;
    if src_cdf.is_degenerate() || ref_cdf.is_degenerate() {
        warn!("CDF match: no valid pixels, using identity LUT");
        return Ok(Lut::identity(source.depth().levels()));
    }
    cdf_match_lut(&src_cdf, &ref_cdf)
}

/// Mean / std matching LUTs for all three channels, in storage order.
pub fn mean_std_luts(
    source: &ColorImage,
    reference: &ColorImage,
    source_mask: &Mask,
    reference_mask: &Mask,
) -> BalanceResult<[Lut; COLOR_CHANNELS]> {
    per_channel(source, reference, |s, r| {
        mean_std_lut(s, r, Some(source_mask), Some(reference_mask))
    })
}

/// CDF matching LUTs for all three channels, in storage order.
pub fn cdf_normalization_luts(
    source: &ColorImage,
    reference: &ColorImage,
    source_mask: &Mask,
    reference_mask: &Mask,
) -> BalanceResult<[Lut; COLOR_CHANNELS]> {
    per_channel(source, reference, |s, r| {
        cdf_normalization_lut(s, r, Some(source_mask), Some(reference_mask))
    })
}

pub(crate) fn per_channel<F>(
    source: &ColorImage,
    reference: &ColorImage,
    mut build: F,
) -> BalanceResult<[Lut; COLOR_CHANNELS]>
where
    F: FnMut(&Band, &Band) -> BalanceResult<Lut>,
{
    let [s0, s1, s2] = source.channels();
    let [r0, r1, r2] = reference.channels();
    Ok([build(s0, r0)?, build(s1, r1)?, build(s2, r2)?])
}

fn check_same_depth(source: &Band, reference: &Band) -> BalanceResult<()> {
    if source.depth() != reference.depth() {
        return Err(colorbal_core::Error::IncompatibleDepths(
            source.depth().bits(),
            reference.depth().bits(),
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorbal_core::SampleDepth;

    fn step_cdf(values: &[(usize, f64)], len: usize) -> Cdf {
        let mut out = vec![0.0; len];
        for &(start, v) in values {
            for e in &mut out[start..] {
                *e = v;
            }
        }
        Cdf::from_values(out)
    }

    #[test]
    fn test_identity_and_constant() {
        let lut = Lut::identity(256);
        assert_eq!(lut.len(), 256);
        assert_eq!(lut.get(200), Some(200));
        assert!(lut.is_monotonic());

        let lut = Lut::constant(4, 3);
        assert_eq!(lut.entries(), &[3, 3, 3, 3]);
        assert_eq!(lut.max_entry(), 3);
    }

    #[test]
    fn test_identity_longer_than_max_saturates() {
        let lut = Lut::identity(MAX_LUT_LEN + 10);
        assert_eq!(lut.len(), MAX_LUT_LEN + 10);
        assert_eq!(lut.get(MAX_LUT_LEN - 1), Some(u16::MAX));
        assert_eq!(lut.get(MAX_LUT_LEN + 9), Some(u16::MAX));
        assert!(lut.is_monotonic());
    }

    #[test]
    fn test_cdf_match_shift_down_by_two() {
        // Source intensities at 3,4,5,6; reference at 1,2,3,4
        let source = step_cdf(&[(3, 0.25), (4, 0.5), (5, 0.75), (6, 1.0)], 8);
        let reference = step_cdf(&[(1, 0.25), (2, 0.5), (3, 0.75), (4, 1.0)], 8);
        let lut = cdf_match_lut(&source, &reference).unwrap();
        assert_eq!(&lut.entries()[3..7], &[1, 2, 3, 4]);
        assert!(lut.is_monotonic());
    }

    #[test]
    fn test_cdf_match_collapse_to_single_level() {
        let source = step_cdf(&[(3, 0.25), (4, 0.5), (5, 0.75), (6, 1.0)], 8);
        let reference = step_cdf(&[(1, 1.0)], 8);
        let lut = cdf_match_lut(&source, &reference).unwrap();
        assert_eq!(&lut.entries()[3..7], &[1, 1, 1, 1]);
    }

    #[test]
    fn test_cdf_match_unreachable_uses_last_index() {
        let source = Cdf::from_values(vec![0.5, 1.0]);
        let reference = Cdf::from_values(vec![0.0, 0.0, 0.0]);
        let lut = cdf_match_lut(&source, &reference).unwrap();
        assert_eq!(lut.entries(), &[2, 2]);
    }

    #[test]
    fn test_cdf_match_empty() {
        let empty = Cdf::from_values(vec![]);
        let cdf = Cdf::from_values(vec![1.0]);
        assert!(cdf_match_lut(&empty, &cdf).is_err());
        assert!(cdf_match_lut(&cdf, &empty).is_err());
    }

    #[test]
    fn test_scale_offset_identity() {
        let lut = Lut::identity(10);
        assert_eq!(scale_offset_lut(&lut, 1.0, 0.0).unwrap(), lut);
    }

    #[test]
    fn test_scale_offset_clipping() {
        let lut = Lut::identity(10);
        let top = scale_offset_lut(&lut, 1.0, 5.0).unwrap();
        assert_eq!(top.entries(), &[5, 6, 7, 8, 9, 9, 9, 9, 9, 9]);
        let bottom = scale_offset_lut(&lut, 1.0, -5.0).unwrap();
        assert_eq!(bottom.entries(), &[0, 0, 0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_scale_offset_scaling() {
        let lut = Lut::identity(10);
        let half = scale_offset_lut(&lut, 0.5, 0.0).unwrap();
        assert_eq!(half.entries(), &[0, 0, 1, 1, 2, 2, 3, 3, 4, 4]);
        let double = scale_offset_lut(&lut, 2.0, 0.0).unwrap();
        assert_eq!(double.entries(), &[0, 2, 4, 6, 8, 9, 9, 9, 9, 9]);

        // Clipping is to the table length, not to the largest entry
        let doubled = Lut::from_vec((0..10).map(|v| 2 * v).collect());
        let lut = scale_offset_lut(&doubled, 0.5, 5.0).unwrap();
        assert_eq!(lut.entries(), &[5, 6, 7, 8, 9, 9, 9, 9, 9, 9]);
    }

    #[test]
    fn test_scale_offset_rejects_non_finite() {
        let lut = Lut::identity(4);
        assert!(scale_offset_lut(&lut, f64::NAN, 0.0).is_err());
        assert!(scale_offset_lut(&lut, 1.0, f64::INFINITY).is_err());
        assert!(scale_offset_lut(&Lut::from_vec(vec![]), 1.0, 0.0).is_err());
    }

    #[test]
    fn test_mean_std_lut_shift() {
        let source = Band::from_u8(4, 1, &[10, 20, 30, 40]).unwrap();
        let reference = Band::from_u8(4, 1, &[20, 30, 40, 50]).unwrap();
        let lut = mean_std_lut(&source, &reference, None, None).unwrap();
        assert_eq!(lut.get(10), Some(20));
        assert_eq!(lut.get(40), Some(50));
        assert_eq!(lut.get(255), Some(255));
    }

    #[test]
    fn test_mean_std_lut_degenerate() {
        let source = Band::from_u8(2, 1, &[7, 7]).unwrap();
        let reference = Band::from_u8(2, 1, &[10, 20]).unwrap();

        // Zero source spread: pure mean shift 7 -> 15
        let lut = mean_std_lut(&source, &reference, None, None).unwrap();
        assert_eq!(lut.get(7), Some(15));

        // No valid pixels: identity
        let none = Mask::from_vec(2, 1, vec![0, 0]).unwrap();
        let lut = mean_std_lut(&source, &reference, Some(&none), None).unwrap();
        assert_eq!(lut, Lut::identity(256));
    }

    #[test]
    fn test_builders_reject_depth_mismatch() {
        let a = Band::new(2, 2, SampleDepth::Bit8).unwrap();
        let b = Band::new(2, 2, SampleDepth::Bit16).unwrap();
        assert!(mean_std_lut(&a, &b, None, None).is_err());
        assert!(cdf_normalization_lut(&a, &b, None, None).is_err());
    }

    #[test]
    fn test_cdf_normalization_degenerate_is_identity() {
        let source = Band::from_u8(2, 1, &[1, 2]).unwrap();
        let reference = Band::from_u8(2, 1, &[3, 4]).unwrap();
        let none = Mask::from_vec(2, 1, vec![0, 0]).unwrap();
        let lut = cdf_normalization_lut(&source, &reference, None, Some(&none)).unwrap();
        assert_eq!(lut, Lut::identity(256));
    }
}
