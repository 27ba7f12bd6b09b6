//! End-to-end color balance regression test
//!
//! Encodes a 16-bit RGBA image, decodes it, converts it to a masked color
//! image, balances it and writes the result back out with the mask as alpha.

use colorbal::balance::{ConvertOptions, MatchMethod, convert_to_colorimage, match_histogram};
use colorbal::io::{ImageFormat, read_image_mem, write_image_mem};
use colorbal::{Band, MultiBandImage, SampleDepth};
use colorbal_test::RegParams;

const W: u32 = 8;
const H: u32 = 4;

fn source_band(offset: u16) -> Band {
    let data = (0..(W * H) as u16).map(|i| i * 1000 + offset).collect();
    Band::from_vec(W, H, SampleDepth::Bit16, data).expect("band")
}

fn source_image() -> MultiBandImage {
    let mut image =
        MultiBandImage::new(vec![source_band(0), source_band(100), source_band(200)])
            .expect("image");
    image.create_alpha().expect("alpha");
    let mut alpha = image.alpha().expect("alpha").to_mut();
    alpha.set_pixel(0, 0, 0).expect("set alpha");
    image.set_alpha(alpha.into()).expect("set alpha");
    image
}

#[test]
fn balance_reg() {
    let mut rp = RegParams::new("balance");

    // --- Test 1: PNG round trip keeps the transparent pixel ---
    let bytes = write_image_mem(&source_image(), ImageFormat::Png).expect("write png");
    let decoded = read_image_mem(&bytes).expect("read png");
    rp.compare_bands(&source_band(100), decoded.band(1).expect("band 1"));

    // --- Test 2: conversion decimates to 8 bits and masks alpha ---
    let (color, mask) = convert_to_colorimage(&decoded, &ConvertOptions::default())
        .expect("convert");
    rp.compare_values(31.0, mask.valid_count() as f64, 0.0);
    rp.compare_values(0.0, f64::from(mask.get(0, 0).unwrap_or(255)), 0.0);
    let expected: Vec<u16> = (0..(W * H) as u16).map(|i| (i * 1000 + 200) >> 8).collect();
    rp.compare_luts(&expected, color.channels()[0].data());

    // --- Test 3: balancing an image against itself changes nothing ---
    for method in [MatchMethod::CdfNormalization, MatchMethod::MeanStd] {
        let balanced =
            match_histogram(&method, &color, &color, Some(&mask), Some(&mask)).expect("match");
        for (orig, out) in color.channels().iter().zip(balanced.channels()) {
            rp.compare_bands(orig, out);
        }
    }

    // --- Test 4: the balanced image is written with the mask as alpha ---
    let balanced = match_histogram(&MatchMethod::MeanStd, &color, &color, Some(&mask), None)
        .expect("match");
    let output = balanced.to_multiband(Some(&mask)).expect("to multiband");
    let bytes = write_image_mem(&output, ImageFormat::Tiff).expect("write tiff");
    let written = read_image_mem(&bytes).expect("read tiff");
    rp.compare_values(3.0, written.band_count() as f64, 0.0);
    rp.compare_bands(output.band(0).expect("band 0"), written.band(0).expect("band 0"));
    let alpha = written.alpha().expect("alpha");
    rp.compare_luts(&[0, 255, 255, 255, 255, 255, 255, 255], alpha.row(0));

    assert!(rp.cleanup());
}
