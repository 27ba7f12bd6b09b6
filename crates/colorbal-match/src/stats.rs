//! Masked band statistics
//!
//! Histograms, cumulative distribution functions and mean / standard
//! deviation over the valid pixels of a band. A pixel is valid when its
//! mask value is 255; without a mask every pixel is valid.

use crate::BalanceResult;
use colorbal_core::{Band, Mask};

/// Intensity histogram of a band
///
/// One bin per native intensity level (256 for 8-bit bands, 65536 for
/// 16-bit bands).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram from raw bin counts.
    pub fn from_counts(counts: Vec<u64>) -> Self {
        Histogram { counts }
    }

    /// Bin counts indexed by intensity.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the histogram has no bins.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count in bin `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    /// Total number of counted pixels.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Cumulative distribution function of a band
///
/// Entry `i` is the fraction of valid pixels with intensity `<= i`.
/// The sequence is non-decreasing and its last entry is exactly 1.0
/// whenever at least one pixel was counted. With no valid pixels the CDF is
/// all zeros; see [`Cdf::is_degenerate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cdf {
    values: Vec<f64>,
}

impl Cdf {
    /// Build a CDF from a histogram.
    ///
    /// Each entry is the running count divided by the total, so rounding
    /// never accumulates and the last entry is exactly 1.0.
    pub fn from_histogram(hist: &Histogram) -> Self {
        let total = hist.total();
        if total == 0 {
            return Cdf {
                values: vec![0.0; hist.len()],
            };
        }
        let total = total as f64;
        let mut running = 0u64;
        let values = hist
            .counts()
            .iter()
            .map(|&c| {
                running += c;
                running as f64 / total
            })
            .collect();
        Cdf { values }
    }

    /// Create a CDF from raw values.
    ///
    /// The values are taken as given; callers are responsible for
    /// monotonicity.
    pub fn from_values(values: Vec<f64>) -> Self {
        Cdf { values }
    }

    /// CDF values indexed by intensity.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the CDF has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// True when the CDF came from zero valid pixels (all entries 0).
    pub fn is_degenerate(&self) -> bool {
        self.values.last().is_none_or(|&v| v == 0.0)
    }
}

/// Mean and population standard deviation of the valid pixels of a band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStats {
    /// Number of valid pixels
    pub count: u64,
    /// Mean intensity
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

/// Compute the intensity histogram of a band.
///
/// Only pixels whose mask value is 255 are counted; with `mask = None`
/// every pixel is counted. The histogram has one bin per native intensity
/// level of the band.
///
/// # Errors
///
/// Returns a core `DimensionMismatch` error if the mask shape differs from
/// the band.
///
/// # Example
///
/// ```
/// use colorbal_core::{Band, Mask};
/// use colorbal_match::get_histogram;
///
/// let band = Band::from_u8(2, 2, &[1, 1, 1, 1]).unwrap();
/// let mask = Mask::from_vec(2, 2, vec![255, 0, 255, 0]).unwrap();
/// let hist = get_histogram(&band, Some(&mask)).unwrap();
/// assert_eq!(hist.len(), 256);
/// assert_eq!(hist.get(1), Some(2));
/// ```
pub fn get_histogram(band: &Band, mask: Option<&Mask>) -> BalanceResult<Histogram> {
    let mask = Mask::resolve(mask, band.width(), band.height())?;
    let mut counts = vec![0u64; band.depth().levels()];

    for (&val, &m) in band.data().iter().zip(mask.data()) {
        if m == colorbal_core::MASK_VALID {
            counts[val as usize] += 1;
        }
    }

    Ok(Histogram { counts })
}

/// Compute the cumulative distribution function of a band.
///
/// With zero valid pixels the result is the all-zero degenerate CDF.
pub fn get_cdf(band: &Band, mask: Option<&Mask>) -> BalanceResult<Cdf> {
    let hist = get_histogram(band, mask)?;
    Ok(Cdf::from_histogram(&hist))
}

/// Compute mean and population standard deviation over valid pixels.
///
/// Returns `Ok(None)` when no pixel is valid. Sums are accumulated exactly
/// in integers before the final division.
pub fn mean_std(band: &Band, mask: Option<&Mask>) -> BalanceResult<Option<BandStats>> {
    let hist = get_histogram(band, mask)?;
    Ok(histogram_mean_std(&hist))
}

/// Mean and population standard deviation of a histogram.
pub fn histogram_mean_std(hist: &Histogram) -> Option<BandStats> {
    let mut n: u128 = 0;
    let mut sum: u128 = 0;
    let mut sum_sq: u128 = 0;
    for (level, &count) in hist.counts().iter().enumerate() {
        let c = u128::from(count);
        let v = level as u128;
        n += c;
        sum += c * v;
        sum_sq += c * v * v;
    }
    if n == 0 {
        return None;
    }

    let mean = sum as f64 / n as f64;
    // n * sum_sq >= sum^2 (Cauchy-Schwarz), so this cannot underflow
    let var_num = n * sum_sq - sum * sum;
    let nf = n as f64;
    let std_dev = (var_num as f64 / (nf * nf)).sqrt();

    Some(BandStats {
        count: n as u64,
        mean,
        std_dev,
    })
}
