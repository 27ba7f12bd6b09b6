//! Histogram matching driver
//!
//! [`match_histogram`] asks a [`LutStrategy`] for one LUT per channel and
//! applies them to the source image. Strategies are interchangeable:
//!
//! - any function or closure with the signature of [`mean_std_luts`] /
//!   [`cdf_normalization_luts`]
//! - a per-band builder lifted with [`PerBand`]
//! - a built-in method chosen by name through [`MatchMethod`]

use crate::apply::apply_luts;
use crate::lut::{Lut, cdf_normalization_luts, mean_std_luts, per_channel};
use crate::{BalanceError, BalanceResult};
use colorbal_core::{Band, COLOR_CHANNELS, ColorImage, Mask};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Computes per-channel LUTs aligning a source image to a reference
///
/// Masks are always present here; [`match_histogram`] resolves absent masks
/// to all-valid ones before calling the strategy.
pub trait LutStrategy {
    /// Compute one LUT per channel, in storage order.
    fn compute_luts(
        &self,
        source: &ColorImage,
        reference: &ColorImage,
        source_mask: &Mask,
        reference_mask: &Mask,
    ) -> BalanceResult<[Lut; COLOR_CHANNELS]>;
}

impl<F> LutStrategy for F
where
    F: Fn(&ColorImage, &ColorImage, &Mask, &Mask) -> BalanceResult<[Lut; COLOR_CHANNELS]>,
{
    fn compute_luts(
        &self,
        source: &ColorImage,
        reference: &ColorImage,
        source_mask: &Mask,
        reference_mask: &Mask,
    ) -> BalanceResult<[Lut; COLOR_CHANNELS]> {
        self(source, reference, source_mask, reference_mask)
    }
}

/// Lift a single-band LUT builder into a [`LutStrategy`]
///
/// The builder is called once per channel with the channel's source and
/// reference bands and the image masks.
///
/// # Example
///
/// ```
/// use colorbal_core::{Band, ColorImage, Mask, SampleDepth};
/// use colorbal_match::{PerBand, match_histogram, mean_std_lut};
///
/// let strategy = PerBand(|s: &Band, r: &Band, sm: &Mask, rm: &Mask| {
///     mean_std_lut(s, r, Some(sm), Some(rm))
/// });
///
/// let band = |v| Band::new_filled(2, 2, SampleDepth::Bit8, v).unwrap();
/// let source = ColorImage::new([band(1), band(2), band(3)]).unwrap();
/// let out = match_histogram(&strategy, &source, &source, None, None).unwrap();
/// assert_eq!(out, source);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PerBand<F>(pub F);

impl<F> LutStrategy for PerBand<F>
where
    F: Fn(&Band, &Band, &Mask, &Mask) -> BalanceResult<Lut>,
{
    fn compute_luts(
        &self,
        source: &ColorImage,
        reference: &ColorImage,
        source_mask: &Mask,
        reference_mask: &Mask,
    ) -> BalanceResult<[Lut; COLOR_CHANNELS]> {
        per_channel(source, reference, |s, r| {
            (self.0)(s, r, source_mask, reference_mask)
        })
    }
}

/// Built-in matching methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMethod {
    /// Match cumulative distributions (full histogram matching)
    #[default]
    CdfNormalization,
    /// Match mean and standard deviation
    MeanStd,
}

impl MatchMethod {
    /// Canonical name, accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            MatchMethod::CdfNormalization => "histogram",
            MatchMethod::MeanStd => "mean_std",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchMethod {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "histogram" | "cdf" => Ok(MatchMethod::CdfNormalization),
            "mean_std" | "meanstd" => Ok(MatchMethod::MeanStd),
            other => Err(BalanceError::InvalidParameters(format!(
                "unknown match method '{other}' (expected 'histogram' or 'mean_std')"
            ))),
        }
    }
}

impl LutStrategy for MatchMethod {
    fn compute_luts(
        &self,
        source: &ColorImage,
        reference: &ColorImage,
        source_mask: &Mask,
        reference_mask: &Mask,
    ) -> BalanceResult<[Lut; COLOR_CHANNELS]> {
        match self {
            MatchMethod::CdfNormalization => {
                cdf_normalization_luts(source, reference, source_mask, reference_mask)
            }
            MatchMethod::MeanStd => mean_std_luts(source, reference, source_mask, reference_mask),
        }
    }
}

/// Color-balance `source` toward `reference`.
///
/// Absent masks are treated as all-valid. The strategy's LUTs are applied to
/// every source pixel, masked or not; masks only restrict which pixels feed
/// the statistics.
///
/// # Arguments
///
/// * `strategy` - LUT computation, e.g. [`MatchMethod::MeanStd`]
/// * `source` - Image to correct
/// * `reference` - Image whose tonal distribution is the target
/// * `source_mask` - Valid source pixels (255), or `None` for all
/// * `reference_mask` - Valid reference pixels (255), or `None` for all
///
/// # Errors
///
/// Propagates mask shape mismatches and strategy errors, and returns
/// [`BalanceError::LutMismatch`] if a LUT does not fit its channel.
///
/// # Example
///
/// ```
/// use colorbal_core::{Band, ColorImage, SampleDepth};
/// use colorbal_match::{MatchMethod, match_histogram};
///
/// let band = |v| Band::new_filled(4, 4, SampleDepth::Bit8, v).unwrap();
/// let source = ColorImage::new([band(10), band(20), band(30)]).unwrap();
/// let reference = ColorImage::new([band(40), band(50), band(60)]).unwrap();
///
/// let out = match_histogram(&MatchMethod::MeanStd, &source, &reference, None, None).unwrap();
/// assert_eq!(out.channel(0).unwrap().get(0, 0), Some(40));
/// ```
pub fn match_histogram<S>(
    strategy: &S,
    source: &ColorImage,
    reference: &ColorImage,
    source_mask: Option<&Mask>,
    reference_mask: Option<&Mask>,
) -> BalanceResult<ColorImage>
where
    S: LutStrategy + ?Sized,
{
    let source_mask = Mask::resolve(source_mask, source.width(), source.height())?;
    let reference_mask = Mask::resolve(reference_mask, reference.width(), reference.height())?;

    let luts = strategy.compute_luts(source, reference, &source_mask, &reference_mask)?;
    for (i, lut) in luts.iter().enumerate() {
        debug!(
            "match: channel {}: {} entries, output {}..={}",
            i,
            lut.len(),
            lut.entries().iter().copied().min().unwrap_or(0),
            lut.max_entry()
        );
    }

    apply_luts(source, &luts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::cdf_normalization_lut;
    use colorbal_core::SampleDepth;

    fn gray(values: &[u8]) -> Band {
        Band::from_u8(values.len() as u32, 1, values).unwrap()
    }

    fn image(values: &[u8]) -> ColorImage {
        let band = gray(values);
        ColorImage::new([band.clone(), band.clone(), band]).unwrap()
    }

    #[test]
    fn test_match_method_from_str() {
        assert_eq!("histogram".parse::<MatchMethod>().unwrap(), MatchMethod::CdfNormalization);
        assert_eq!("CDF".parse::<MatchMethod>().unwrap(), MatchMethod::CdfNormalization);
        assert_eq!("mean_std".parse::<MatchMethod>().unwrap(), MatchMethod::MeanStd);
        assert_eq!("meanstd".parse::<MatchMethod>().unwrap(), MatchMethod::MeanStd);
        assert!("hsv".parse::<MatchMethod>().is_err());
        assert_eq!(MatchMethod::MeanStd.to_string(), "mean_std");
    }

    #[test]
    fn test_constant_lut_strategy() {
        let source = image(&[0, 50, 100, 200]);
        let strategy = |_: &ColorImage,
                        _: &ColorImage,
                        _: &Mask,
                        _: &Mask|
         -> BalanceResult<[Lut; COLOR_CHANNELS]> {
            Ok([
                Lut::constant(256, 1),
                Lut::constant(256, 2),
                Lut::constant(256, 3),
            ])
        };
        let out = match_histogram(&strategy, &source, &source, None, None).unwrap();
        for (i, channel) in out.channels().iter().enumerate() {
            assert!(channel.data().iter().all(|&v| v == i as u16 + 1));
        }
    }

    #[test]
    fn test_self_match_is_identity() {
        let source = image(&[3, 3, 7, 9, 200, 255]);
        let out = match_histogram(&MatchMethod::CdfNormalization, &source, &source, None, None)
            .unwrap();
        assert_eq!(out, source);
        let out = match_histogram(&MatchMethod::MeanStd, &source, &source, None, None).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_per_band_matches_builtin() {
        let source = image(&[3, 4, 5, 6]);
        let reference = image(&[1, 2, 3, 4]);
        let per_band = PerBand(|s: &Band, r: &Band, sm: &Mask, rm: &Mask| {
            cdf_normalization_lut(s, r, Some(sm), Some(rm))
        });
        let a = match_histogram(&per_band, &source, &reference, None, None).unwrap();
        let b = match_histogram(&MatchMethod::CdfNormalization, &source, &reference, None, None)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.channel(0).unwrap().data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_masked_reference_pixels_ignored() {
        let source = image(&[10, 20]);
        let reference = image(&[40, 200]);
        let mask = Mask::from_vec(2, 1, vec![255, 0]).unwrap();
        let out = match_histogram(&MatchMethod::MeanStd, &source, &reference, None, Some(&mask))
            .unwrap();
        // Reference collapses to a single level at 40
        assert!(out.channel(0).unwrap().data().iter().all(|&v| v == 40));
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let source = image(&[1, 2, 3]);
        let mask = Mask::all_valid(2, 1).unwrap();
        assert!(match_histogram(&MatchMethod::MeanStd, &source, &source, Some(&mask), None).is_err());
    }

    #[test]
    fn test_strategy_lut_too_short() {
        let source = ColorImage::new([
            Band::new(2, 2, SampleDepth::Bit8).unwrap(),
            Band::new(2, 2, SampleDepth::Bit8).unwrap(),
            Band::new(2, 2, SampleDepth::Bit8).unwrap(),
        ])
        .unwrap();
        let strategy = |_: &ColorImage,
                        _: &ColorImage,
                        _: &Mask,
                        _: &Mask|
         -> BalanceResult<[Lut; COLOR_CHANNELS]> {
            Ok([Lut::identity(4), Lut::identity(4), Lut::identity(4)])
        };
        let err = match_histogram(&strategy, &source, &source, None, None).unwrap_err();
        assert!(matches!(err, BalanceError::LutMismatch(_)));
    }
}
