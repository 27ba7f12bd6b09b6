//! TIFF image format support
//!
//! Reads gray, gray+alpha, RGB, RGBA and generic multiband (e.g. 4-band
//! BGRN satellite) images at 8 or 16 bits per sample. Writes gray, RGB and
//! RGBA images.

use crate::samples::{deinterleave, interleave};
use crate::{IoError, IoResult};
use colorbal_core::{MultiBandImage, SampleDepth};
use log::debug;
use std::io::{Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{Gray8, Gray16, RGB8, RGB16, RGBA8, RGBA16};
use tiff::encoder::{Compression, DeflateLevel, TiffEncoder};

/// TIFF compression format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression
    #[default]
    None,
    /// LZW compression
    Lzw,
    /// ZIP/Deflate compression
    Deflate,
    /// PackBits compression
    PackBits,
}

impl TiffCompression {
    /// Convert to tiff crate's Compression enum
    fn to_tiff_compression(self) -> Compression {
        match self {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate => Compression::Deflate(DeflateLevel::default()),
            TiffCompression::PackBits => Compression::Packbits,
        }
    }
}

/// Read the first page of a TIFF image
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<MultiBandImage> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;

    let (spp, has_alpha, bits) = match color_type {
        ColorType::Gray(n) => (1, false, n),
        ColorType::GrayA(n) => (2, true, n),
        ColorType::RGB(n) => (3, false, n),
        ColorType::RGBA(n) => (4, true, n),
        ColorType::Multiband {
            bit_depth,
            num_samples,
        } => (usize::from(num_samples), false, bit_depth),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF color type: {:?}",
                color_type
            )));
        }
    };
    debug!(
        "TIFF {}x{}: {:?}, {} samples per pixel",
        width, height, color_type, spp
    );

    let image_data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;

    match (bits, image_data) {
        (8, DecodingResult::U8(data)) => {
            let samples: Vec<u16> = data.iter().map(|&v| u16::from(v)).collect();
            deinterleave(width, height, SampleDepth::Bit8, &samples, spp, has_alpha)
        }
        (16, DecodingResult::U16(data)) => {
            deinterleave(width, height, SampleDepth::Bit16, &data, spp, has_alpha)
        }
        (bits, _) => Err(IoError::UnsupportedFormat(format!(
            "unsupported TIFF sample format: {} bits",
            bits
        ))),
    }
}

/// Write a TIFF image
///
/// # Arguments
///
/// * `image` - Gray or RGB image, optionally with alpha (RGB only)
/// * `writer` - The writer to write to
/// * `compression` - The compression format to use
pub fn write_tiff<W: Write + Seek>(
    image: &MultiBandImage,
    writer: W,
    compression: TiffCompression,
) -> IoResult<()> {
    let data = interleave(image)?;
    let (w, h) = (data.width, data.height);
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?
        .with_compression(compression.to_tiff_compression());

    let result = match (data.bands, data.has_alpha, data.depth) {
        (1, false, SampleDepth::Bit8) => encoder.write_image::<Gray8>(w, h, &data.to_u8()),
        (1, false, SampleDepth::Bit16) => encoder.write_image::<Gray16>(w, h, &data.samples),
        (3, false, SampleDepth::Bit8) => encoder.write_image::<RGB8>(w, h, &data.to_u8()),
        (3, false, SampleDepth::Bit16) => encoder.write_image::<RGB16>(w, h, &data.samples),
        (3, true, SampleDepth::Bit8) => encoder.write_image::<RGBA8>(w, h, &data.to_u8()),
        (3, true, SampleDepth::Bit16) => encoder.write_image::<RGBA16>(w, h, &data.samples),
        _ => {
            return Err(IoError::UnsupportedFormat(
                "TIFF output does not support gray+alpha".to_string(),
            ));
        }
    };
    result.map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorbal_core::Band;
    use std::io::Cursor;

    fn ramp(w: u32, h: u32, depth: SampleDepth, step: u16) -> Band {
        let data = (0..w * h).map(|i| i as u16 * step).collect();
        Band::from_vec(w, h, depth, data).unwrap()
    }

    fn roundtrip(image: &MultiBandImage, compression: TiffCompression) -> MultiBandImage {
        let mut buffer = Cursor::new(Vec::new());
        write_tiff(image, &mut buffer, compression).unwrap();
        buffer.set_position(0);
        read_tiff(buffer).unwrap()
    }

    #[test]
    fn test_tiff_roundtrip_gray() {
        let image = MultiBandImage::new(vec![ramp(10, 10, SampleDepth::Bit8, 2)]).unwrap();
        assert_eq!(roundtrip(&image, TiffCompression::None), image);
    }

    #[test]
    fn test_tiff_roundtrip_rgb16_compressed() {
        let bands = vec![
            ramp(8, 4, SampleDepth::Bit16, 1000),
            ramp(8, 4, SampleDepth::Bit16, 10),
            ramp(8, 4, SampleDepth::Bit16, 1),
        ];
        let image = MultiBandImage::new(bands).unwrap();
        for compression in [
            TiffCompression::Lzw,
            TiffCompression::Deflate,
            TiffCompression::PackBits,
        ] {
            assert_eq!(roundtrip(&image, compression), image);
        }
    }

    #[test]
    fn test_tiff_rgba_alpha_band() {
        let bands = vec![
            ramp(4, 1, SampleDepth::Bit8, 1),
            ramp(4, 1, SampleDepth::Bit8, 2),
            ramp(4, 1, SampleDepth::Bit8, 3),
        ];
        let alpha = Band::from_u8(4, 1, &[255, 0, 255, 255]).unwrap();
        let image = MultiBandImage::with_alpha(bands, alpha).unwrap();
        let read = roundtrip(&image, TiffCompression::None);
        assert_eq!(read.alpha().unwrap().data(), &[255, 0, 255, 255]);
        assert_eq!(read, image);
    }

    #[test]
    fn test_tiff_gray_alpha_unsupported() {
        let gray = ramp(2, 1, SampleDepth::Bit8, 1);
        let alpha = Band::from_u8(2, 1, &[255, 0]).unwrap();
        let image = MultiBandImage::with_alpha(vec![gray], alpha).unwrap();
        let mut buffer = Cursor::new(Vec::new());
        assert!(matches!(
            write_tiff(&image, &mut buffer, TiffCompression::None),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
