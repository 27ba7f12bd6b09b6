//! Conversion between interleaved file samples and planar bands

use crate::{IoError, IoResult};
use colorbal_core::{Band, MultiBandImage, SampleDepth};

/// Interleaved pixel samples ready for an encoder
#[derive(Debug)]
pub(crate) struct Interleaved {
    pub width: u32,
    pub height: u32,
    pub depth: SampleDepth,
    /// Color samples per pixel (1 or 3), alpha excluded
    pub bands: usize,
    pub has_alpha: bool,
    pub samples: Vec<u16>,
}

impl Interleaved {
    /// Samples per pixel, alpha included.
    pub fn spp(&self) -> usize {
        self.bands + usize::from(self.has_alpha)
    }

    /// Samples narrowed to bytes; only valid for 8-bit data.
    pub fn to_u8(&self) -> Vec<u8> {
        self.samples.iter().map(|&v| v as u8).collect()
    }

    /// Samples as big-endian byte pairs.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|v| v.to_be_bytes()).collect()
    }
}

/// Split interleaved samples into bands.
///
/// With `has_alpha`, the last sample of each pixel becomes the alpha band.
pub(crate) fn deinterleave(
    width: u32,
    height: u32,
    depth: SampleDepth,
    samples: &[u16],
    spp: usize,
    has_alpha: bool,
) -> IoResult<MultiBandImage> {
    let pixels = width as usize * height as usize;
    if spp == 0 || (has_alpha && spp < 2) {
        return Err(IoError::InvalidData(format!(
            "{spp} samples per pixel (alpha: {has_alpha})"
        )));
    }
    if samples.len() < pixels * spp {
        return Err(IoError::InvalidData(format!(
            "expected {} samples, got {}",
            pixels * spp,
            samples.len()
        )));
    }

    let mut planes = vec![Vec::with_capacity(pixels); spp];
    for pixel in samples[..pixels * spp].chunks_exact(spp) {
        for (plane, &v) in planes.iter_mut().zip(pixel) {
            plane.push(v);
        }
    }

    let mut bands = planes
        .into_iter()
        .map(|plane| Band::from_vec(width, height, depth, plane))
        .collect::<Result<Vec<_>, _>>()?;

    let alpha = if has_alpha { bands.pop() } else { None };
    let image = match alpha {
        Some(alpha) => MultiBandImage::with_alpha(bands, alpha)?,
        None => MultiBandImage::new(bands)?,
    };
    Ok(image)
}

/// Interleave the bands of an image, alpha last.
///
/// Only gray (1 band) and RGB (3 band) images can be written. An alpha band
/// of a different depth is rescaled to the image depth.
pub(crate) fn interleave(image: &MultiBandImage) -> IoResult<Interleaved> {
    let bands = image.band_count();
    if bands != 1 && bands != 3 {
        return Err(IoError::UnsupportedFormat(format!(
            "cannot write {bands}-band image (1 or 3 bands supported)"
        )));
    }

    let depth = image.depth();
    let alpha = image.alpha().map(|a| rescale_alpha(a, depth));
    let mut planes: Vec<&[u16]> = image.bands().iter().map(Band::data).collect();
    if let Some(alpha) = &alpha {
        planes.push(alpha.as_slice());
    }

    let pixels = image.width() as usize * image.height() as usize;
    let mut samples = Vec::with_capacity(pixels * planes.len());
    for i in 0..pixels {
        samples.extend(planes.iter().map(|plane| plane[i]));
    }

    Ok(Interleaved {
        width: image.width(),
        height: image.height(),
        depth,
        bands,
        has_alpha: alpha.is_some(),
        samples,
    })
}

/// Only a zero alpha stays transparent when narrowing 16 to 8 bits.
fn rescale_alpha(alpha: &Band, depth: SampleDepth) -> Vec<u16> {
    match (alpha.depth(), depth) {
        (SampleDepth::Bit8, SampleDepth::Bit16) => alpha.data().iter().map(|&v| v * 257).collect(),
        (SampleDepth::Bit16, SampleDepth::Bit8) => alpha
            .data()
            .iter()
            .map(|&v| if v == 0 { 0 } else { (v >> 8).max(1) })
            .collect(),
        _ => alpha.data().to_vec(),
    }
}
