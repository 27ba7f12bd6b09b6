//! colorbal-io - Image I/O for color balancing
//!
//! Reads PNG and TIFF files into [`MultiBandImage`]s and writes them back.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PNG    | gray, gray+alpha, RGB, RGBA, palette; 1-16 bit | gray, gray+alpha, RGB, RGBA; 8/16 bit | `png-format` |
//! | TIFF   | gray, gray+alpha, RGB, RGBA, multiband; 8/16 bit | gray, RGB, RGBA; 8/16 bit | `tiff-format` |
//!
//! The trailing alpha sample of a file becomes the image's alpha band.

mod error;
pub mod format;
#[cfg(feature = "png-format")]
pub mod png;
mod samples;
#[cfg(feature = "tiff-format")]
pub mod tiff;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};
#[cfg(feature = "tiff-format")]
pub use crate::tiff::TiffCompression;

use colorbal_core::MultiBandImage;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file, detecting the format from its header.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<MultiBandImage> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let file = File::open(path)?;
    read_image_format(BufReader::new(file), format)
}

/// Read an image from memory, detecting the format from its header.
pub fn read_image_mem(data: &[u8]) -> IoResult<MultiBandImage> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

/// Read an image of a known format.
pub fn read_image_format<R: std::io::BufRead + std::io::Seek>(
    reader: R,
    format: ImageFormat,
) -> IoResult<MultiBandImage> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::read_tiff(reader),
        #[allow(unreachable_patterns)]
        _ => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            format
        ))),
    }
}

/// Write an image to a file.
///
/// TIFF output is uncompressed; use [`tiff::write_tiff`] to choose a
/// compression.
pub fn write_image<P: AsRef<Path>>(
    image: &MultiBandImage,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_format(image, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into memory.
pub fn write_image_mem(image: &MultiBandImage, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    write_image_format(image, &mut buffer, format)?;
    Ok(buffer.into_inner())
}

fn write_image_format<W: Write + std::io::Seek>(
    image: &MultiBandImage,
    writer: W,
    format: ImageFormat,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(image, writer),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::write_tiff(image, writer, TiffCompression::None),
        #[allow(unreachable_patterns)]
        _ => {
            let _ = (image, writer);
            Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                format
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorbal_core::{Band, SampleDepth};

    fn sample_image() -> MultiBandImage {
        let band = |step: u16| {
            let data = (0..12u16).map(|i| i * step).collect();
            Band::from_vec(4, 3, SampleDepth::Bit8, data).unwrap()
        };
        MultiBandImage::new(vec![band(1), band(5), band(20)]).unwrap()
    }

    #[test]
    fn test_mem_roundtrip_all_formats() {
        let image = sample_image();
        for format in [ImageFormat::Png, ImageFormat::Tiff] {
            let bytes = write_image_mem(&image, format).unwrap();
            assert_eq!(detect_format_from_bytes(&bytes).unwrap(), format);
            assert_eq!(read_image_mem(&bytes).unwrap(), image);
        }
    }

    #[test]
    fn test_read_garbage() {
        assert!(matches!(
            read_image_mem(b"not an image"),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
