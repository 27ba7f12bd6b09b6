//! Color image conversion regression test
//!
//! Band selection and reordering, alpha masking, bit depth decimation with
//! overflow masking, and tone curves with and without their own decimation.

use colorbal_core::{Band, ColorImage, Mask, MultiBandImage, SampleDepth};
use colorbal_match::{
    BalanceError, ConvertOptions, ToneCurve, convert_to_colorimage, get_histogram,
};
use colorbal_test::RegParams;

fn four_band_image() -> MultiBandImage {
    // Each band's intensity equals its band number
    let bands = (0..4)
        .map(|v| Band::new_filled(5, 5, SampleDepth::Bit8, v).expect("band"))
        .collect();
    MultiBandImage::new(bands).expect("image")
}

fn sixteen_bit_image() -> MultiBandImage {
    let band = Band::from_vec(2, 2, SampleDepth::Bit16, vec![0, 256, 4095, 65535]).expect("band");
    MultiBandImage::new(vec![band.clone(), band.clone(), band]).expect("image")
}

fn halve(b: &Band) -> colorbal_core::Result<Band> {
    let data = b.data().iter().map(|&v| v / 2).collect();
    Band::from_vec(b.width(), b.height(), b.depth(), data)
}

#[test]
fn colorimage_reg() {
    let mut rp = RegParams::new("colorimage");

    // --- Test 1: a 4-band image needs an explicit selection ---
    let mut image = four_band_image();
    let res = convert_to_colorimage(&image, &ConvertOptions::default());
    rp.compare_values(
        1.0,
        if matches!(res, Err(BalanceError::ImageProperty(_))) { 1.0 } else { 0.0 },
        0.0,
    );

    // --- Test 2: selection [0, 2, 3] is stored reversed, mask blank ---
    let options = ConvertOptions::default().with_band_indices([0, 2, 3]);
    let (color, mask) = convert_to_colorimage(&image, &options).expect("convert");
    for (channel, expected) in color.channels().iter().zip([3u16, 2, 0]) {
        let band = Band::new_filled(5, 5, SampleDepth::Bit8, expected).expect("band");
        rp.compare_bands(&band, channel);
    }
    rp.compare_values(25.0, mask.valid_count() as f64, 0.0);

    // --- Test 3: a transparent alpha pixel is masked ---
    image.create_alpha().expect("alpha");
    let mut alpha = image.alpha().expect("alpha").to_mut();
    alpha.set_pixel(2, 2, 0).expect("set alpha");
    image.set_alpha(alpha.into()).expect("set alpha");
    let (_, mask) = convert_to_colorimage(&image, &options).expect("convert");
    rp.compare_values(0.0, f64::from(mask.get(2, 2).unwrap_or(255)), 0.0);
    rp.compare_values(24.0, mask.valid_count() as f64, 0.0);

    // --- Test 4: the curve sees full-depth bands in selection order ---
    let curve = ToneCurve::source_depth(|bands| {
        Ok([halve(&bands[0])?, halve(&bands[1])?, halve(&bands[2])?])
    });
    let (color, _) =
        convert_to_colorimage(&image, &options.clone().with_curve(curve)).expect("convert");
    for (channel, expected) in color.channels().iter().zip([1u16, 1, 0]) {
        let band = Band::new_filled(5, 5, SampleDepth::Bit8, expected).expect("band");
        rp.compare_bands(&band, channel);
    }

    // --- Test 5: 16-bit data without a declared depth uses all 16 bits ---
    let deep = sixteen_bit_image();
    let (color, mask) = convert_to_colorimage(&deep, &ConvertOptions::default()).expect("convert");
    for channel in color.channels() {
        rp.compare_luts(&[0, 1, 15, 255], channel.data());
    }
    rp.compare_strings(&[255; 4], mask.data());

    // --- Test 6: 12 significant bits (or 4096 levels), 65535 overflows ---
    let options = ConvertOptions::default().with_bit_depth(12);
    let (color, mask) = convert_to_colorimage(&deep, &options).expect("convert");
    for channel in color.channels() {
        rp.compare_luts(&[0, 16, 255, 255], channel.data());
    }
    rp.compare_strings(&[255, 255, 255, 0], mask.data());
    let options = ConvertOptions::default().with_bit_depth(1 << 12);
    let (color, mask) = convert_to_colorimage(&deep, &options).expect("convert");
    rp.compare_luts(&[0, 16, 255, 255], color.channels()[0].data());
    rp.compare_strings(&[255, 255, 255, 0], mask.data());

    // --- Test 7: an 8-bit curve output is not decimated again ---
    let curve = ToneCurve::eight_bit(|bands| {
        let to_8 = |b: &Band| {
            let data = b.data().iter().map(|&v| v >> 8).collect();
            Band::from_vec(b.width(), b.height(), SampleDepth::Bit8, data)
        };
        Ok([to_8(&bands[0])?, to_8(&bands[1])?, to_8(&bands[2])?])
    });
    let options = ConvertOptions::default().with_curve(curve);
    let (color, _) = convert_to_colorimage(&deep, &options).expect("convert");
    for channel in color.channels() {
        rp.compare_luts(&[0, 1, 15, 255], channel.data());
    }

    // --- Test 8: statistics of a converted image honor its mask ---
    let options = ConvertOptions::default().with_bit_depth(12);
    let (color, mask) = convert_to_colorimage(&deep, &options).expect("convert");
    let hist = get_histogram(&color.channels()[0], Some(&mask)).expect("histogram");
    rp.compare_values(3.0, hist.total() as f64, 0.0);
    rp.compare_values(1.0, hist.get(255).unwrap_or(0) as f64, 0.0);

    // --- Test 9: a partially valid mask value stays invalid through alpha ---
    let ch = |v| Band::new_filled(2, 1, SampleDepth::Bit8, v).expect("band");
    let color = ColorImage::from_selection_order([ch(1), ch(2), ch(3)]).expect("color");
    let mask = Mask::from_vec(2, 1, vec![255, 128]).expect("mask");
    let written = color.to_multiband(Some(&mask)).expect("to multiband");
    let (_, reread) =
        convert_to_colorimage(&written, &ConvertOptions::default()).expect("convert");
    rp.compare_values(mask.valid_count() as f64, reread.valid_count() as f64, 0.0);
    rp.compare_strings(&[255, 0], reread.data());

    assert!(rp.cleanup());
}
