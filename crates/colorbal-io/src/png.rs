//! PNG image format support

use crate::samples::{deinterleave, interleave};
use crate::{IoError, IoResult};
use colorbal_core::{MultiBandImage, SampleDepth};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
///
/// Palette images and gray images below 8 bits are expanded to 8-bit
/// samples, and a `tRNS` chunk becomes an alpha band.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<MultiBandImage> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();

    let (spp, has_alpha) = match color_type {
        ColorType::Grayscale => (1, false),
        ColorType::GrayscaleAlpha => (2, true),
        ColorType::Rgb => (3, false),
        ColorType::Rgba => (4, true),
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "PNG palette was not expanded".to_string(),
            ));
        }
    };
    let depth = match bit_depth {
        BitDepth::Eight => SampleDepth::Bit8,
        BitDepth::Sixteen => SampleDepth::Bit16,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG bit depth after expansion: {:?}",
                other
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    // Rows are packed without padding once expanded to 8 or 16 bits
    let bytes_per_row = output_info.line_size;
    let row_samples = width as usize * spp;
    let mut samples = Vec::with_capacity(row_samples * height as usize);
    for y in 0..height as usize {
        let row = &buf[y * bytes_per_row..(y + 1) * bytes_per_row];
        match depth {
            SampleDepth::Bit8 => samples.extend(row[..row_samples].iter().map(|&v| u16::from(v))),
            SampleDepth::Bit16 => samples.extend(
                row[..row_samples * 2]
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
            ),
        }
    }

    deinterleave(width, height, depth, &samples, spp, has_alpha)
}

/// Write a PNG image
///
/// Gray and RGB images are written with or without alpha, at 8 or 16 bits.
pub fn write_png<W: Write>(image: &MultiBandImage, writer: W) -> IoResult<()> {
    let data = interleave(image)?;

    let color_type = match (data.bands, data.has_alpha) {
        (1, false) => ColorType::Grayscale,
        (1, true) => ColorType::GrayscaleAlpha,
        (3, false) => ColorType::Rgb,
        _ => ColorType::Rgba,
    };
    let (bit_depth, bytes) = match data.depth {
        SampleDepth::Bit8 => (BitDepth::Eight, data.to_u8()),
        SampleDepth::Bit16 => (BitDepth::Sixteen, data.to_be_bytes()),
    };

    let mut encoder = Encoder::new(writer, data.width, data.height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(&bytes)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
