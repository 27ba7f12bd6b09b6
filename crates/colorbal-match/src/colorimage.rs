//! Conversion from multi-band imagery to 8-bit color images
//!
//! [`convert_to_colorimage`] selects three bands of a [`MultiBandImage`],
//! optionally runs a [`ToneCurve`] over them at full depth, decimates the
//! result to 8 bits and derives a validity [`Mask`] from the alpha band and
//! from samples that overflow the declared bit depth.
//!
//! # Bit depth
//!
//! Sensors often store 10, 12 or 14 significant bits in a 16-bit container.
//! `bit_depth` declares how many bits carry data, either as a bit count
//! (`12`) or as the number of levels (`4096`). Samples are shifted right by
//! `bits - 8` and any sample at or above `2^bits` is masked instead of
//! clipped.

use crate::{BalanceError, BalanceResult};
use colorbal_core::{Band, COLOR_CHANNELS, ColorImage, Mask, MultiBandImage, SampleDepth};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Default band selection for three-band images
pub const DEFAULT_BAND_INDICES: [usize; COLOR_CHANNELS] = [0, 1, 2];

/// Value range produced by a [`ToneCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveOutput {
    /// Output keeps the source bands' native depth and is decimated
    /// afterwards like uncurved data.
    #[default]
    SourceDepth,
    /// Output is already 8-bit and is used as-is, skipping decimation.
    EightBit,
}

type CurveFn = dyn Fn(&[Band; COLOR_CHANNELS]) -> BalanceResult<[Band; COLOR_CHANNELS]> + Send + Sync;

/// Caller-supplied transform over the three selected full-depth bands
///
/// The function receives the bands in selection order and returns three
/// bands of the same shape. Its declared [`CurveOutput`] decides whether the
/// result still needs decimation.
#[derive(Clone)]
pub struct ToneCurve {
    output: CurveOutput,
    func: Arc<CurveFn>,
}

impl ToneCurve {
    /// Create a curve with an explicit output range.
    pub fn new<F>(output: CurveOutput, func: F) -> Self
    where
        F: Fn(&[Band; COLOR_CHANNELS]) -> BalanceResult<[Band; COLOR_CHANNELS]>
            + Send
            + Sync
            + 'static,
    {
        ToneCurve {
            output,
            func: Arc::new(func),
        }
    }

    /// Curve whose output stays at the source depth.
    pub fn source_depth<F>(func: F) -> Self
    where
        F: Fn(&[Band; COLOR_CHANNELS]) -> BalanceResult<[Band; COLOR_CHANNELS]>
            + Send
            + Sync
            + 'static,
    {
        Self::new(CurveOutput::SourceDepth, func)
    }

    /// Curve that produces final 8-bit output.
    pub fn eight_bit<F>(func: F) -> Self
    where
        F: Fn(&[Band; COLOR_CHANNELS]) -> BalanceResult<[Band; COLOR_CHANNELS]>
            + Send
            + Sync
            + 'static,
    {
        Self::new(CurveOutput::EightBit, func)
    }

    /// Declared output range.
    pub fn output(&self) -> CurveOutput {
        self.output
    }

    /// Run the curve on bands in selection order.
    pub fn apply(&self, bands: &[Band; COLOR_CHANNELS]) -> BalanceResult<[Band; COLOR_CHANNELS]> {
        (self.func)(bands)
    }
}

impl fmt::Debug for ToneCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToneCurve")
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

/// Options for [`convert_to_colorimage`]
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Bands to use as (channel 0, channel 1, channel 2), usually (R, G, B).
    /// `None` requires a three-band image and selects `[0, 1, 2]`.
    pub band_indices: Option<[usize; COLOR_CHANNELS]>,
    /// Significant bits per sample, as a bit count (8..=16) or a level
    /// count (256, 512, ..., 65536). `None` uses the native depth.
    pub bit_depth: Option<u32>,
    /// Transform applied before decimation
    pub curve: Option<ToneCurve>,
}

impl ConvertOptions {
    /// Select bands by index, in (R, G, B) order.
    pub fn with_band_indices(mut self, indices: [usize; COLOR_CHANNELS]) -> Self {
        self.band_indices = Some(indices);
        self
    }

    /// Declare the significant range per sample, e.g. `12` or `4096`.
    pub fn with_bit_depth(mut self, bit_depth: u32) -> Self {
        self.bit_depth = Some(bit_depth);
        self
    }

    /// Apply a tone curve before decimation.
    pub fn with_curve(mut self, curve: ToneCurve) -> Self {
        self.curve = Some(curve);
        self
    }
}

/// Convert a multi-band image into an 8-bit color image and validity mask.
///
/// # Arguments
///
/// * `image` - Source bands, with optional alpha
/// * `options` - Band selection, declared bit depth and tone curve
///
/// # Returns
///
/// The color image in BGR storage order (the reverse of the selection) and
/// a mask that is 0 where the alpha band is 0 or any selected band overflows
/// the declared bit depth, 255 elsewhere.
///
/// # Errors
///
/// - [`BalanceError::ImageProperty`] if the selection does not fit the image
///   or the curve returns bands of the wrong shape or depth
/// - [`BalanceError::InvalidParameters`] if `bit_depth` is outside
///   `8..=native bits`
///
/// # Example
///
/// ```
/// use colorbal_core::{Band, MultiBandImage, SampleDepth};
/// use colorbal_match::{ConvertOptions, convert_to_colorimage};
///
/// let bands = (0..4)
///     .map(|v| Band::new_filled(5, 5, SampleDepth::Bit8, v).unwrap())
///     .collect();
/// let image = MultiBandImage::new(bands).unwrap();
///
/// let options = ConvertOptions::default().with_band_indices([0, 2, 3]);
/// let (color, mask) = convert_to_colorimage(&image, &options).unwrap();
/// assert_eq!(color.channel(0).unwrap().get(0, 0), Some(3));
/// assert_eq!(mask.valid_count(), 25);
/// ```
pub fn convert_to_colorimage(
    image: &MultiBandImage,
    options: &ConvertOptions,
) -> BalanceResult<(ColorImage, Mask)> {
    let selected = select_bands(image, options.band_indices)?;
    let native = image.depth();
    let bit_depth = resolve_bit_depth(native, options.bit_depth)?;
    let (w, h) = (image.width(), image.height());

    let mut mask = Mask::all_valid(w, h)?;
    if let Some(alpha) = image.alpha() {
        for (idx, &a) in alpha.data().iter().enumerate() {
            if a == 0 {
                mask.invalidate_index(idx);
            }
        }
    }
    if bit_depth < native.bits() {
        let limit = 1u32 << bit_depth;
        for band in &selected {
            for (idx, &v) in band.data().iter().enumerate() {
                if u32::from(v) >= limit {
                    mask.invalidate_index(idx);
                }
            }
        }
    }

    let bands = match &options.curve {
        Some(curve) => {
            let curved = curve.apply(&selected)?;
            let expected = match curve.output() {
                CurveOutput::SourceDepth => native,
                CurveOutput::EightBit => SampleDepth::Bit8,
            };
            for band in &curved {
                check_curve_band(band, w, h, expected)?;
            }
            debug!("convert: applied {:?} tone curve", curve.output());
            match curve.output() {
                CurveOutput::SourceDepth => decimate_all(&curved, bit_depth)?,
                CurveOutput::EightBit => curved,
            }
        }
        None => decimate_all(&selected, bit_depth)?,
    };

    debug!(
        "convert: {}x{} {}-bit image, {} significant bits, {} of {} pixels masked",
        w,
        h,
        native.bits(),
        bit_depth,
        mask.data().len() - mask.valid_count(),
        mask.data().len()
    );

    let color = ColorImage::from_selection_order(bands)?;
    Ok((color, mask))
}

fn select_bands(
    image: &MultiBandImage,
    indices: Option<[usize; COLOR_CHANNELS]>,
) -> BalanceResult<[Band; COLOR_CHANNELS]> {
    let count = image.band_count();
    let indices = match indices {
        Some(indices) => indices,
        None if count == COLOR_CHANNELS => DEFAULT_BAND_INDICES,
        None => {
            return Err(BalanceError::ImageProperty(format!(
                "image has {count} bands; band indices are required unless it has exactly {COLOR_CHANNELS}"
            )));
        }
    };

    let pick = |i: usize| {
        image.band(i).cloned().ok_or_else(|| {
            BalanceError::ImageProperty(format!("band index {i} out of range for {count} bands"))
        })
    };
    Ok([pick(indices[0])?, pick(indices[1])?, pick(indices[2])?])
}

/// Level counts are powers of two of at least 256, so they never collide
/// with a bit count.
fn resolve_bit_depth(native: SampleDepth, requested: Option<u32>) -> BalanceResult<u32> {
    let requested = requested.unwrap_or(native.bits());
    let bits = if requested >= 256 && requested.is_power_of_two() {
        requested.trailing_zeros()
    } else {
        requested
    };
    if !(8..=native.bits()).contains(&bits) {
        return Err(BalanceError::InvalidParameters(format!(
            "bit depth {requested} outside 8..={} bits (or 256..={} levels) for {}-bit bands",
            native.bits(),
            native.max_value() + 1,
            native.bits()
        )));
    }
    Ok(bits)
}

fn check_curve_band(band: &Band, width: u32, height: u32, depth: SampleDepth) -> BalanceResult<()> {
    if band.dimensions() != (width, height) || band.depth() != depth {
        return Err(BalanceError::ImageProperty(format!(
            "tone curve returned a {}x{} {}-bit band, expected {}x{} {}-bit",
            band.width(),
            band.height(),
            band.depth().bits(),
            width,
            height,
            depth.bits()
        )));
    }
    Ok(())
}

fn decimate_all(
    bands: &[Band; COLOR_CHANNELS],
    bit_depth: u32,
) -> BalanceResult<[Band; COLOR_CHANNELS]> {
    Ok([
        decimate(&bands[0], bit_depth)?,
        decimate(&bands[1], bit_depth)?,
        decimate(&bands[2], bit_depth)?,
    ])
}

/// Shift samples down to 8 bits, saturating at 255.
fn decimate(band: &Band, bit_depth: u32) -> BalanceResult<Band> {
    if band.depth() == SampleDepth::Bit8 {
        return Ok(band.clone());
    }
    let shift = bit_depth - 8;
    let data = band
        .data()
        .iter()
        .map(|&v| (v >> shift).min(u16::from(u8::MAX)))
        .collect();
    Ok(Band::from_vec(
        band.width(),
        band.height(),
        SampleDepth::Bit8,
        data,
    )?)
}
