//! Host-level tests for the HSV to RGB conversion.
#![cfg(feature = "host")]

use strip_flicker::hsv::{Hsv, hsv_to_rgb};
use strip_flicker::led_strip::Rgb;

/// Single-precision rendition of the classic `led_strip_hsv2rgb` helper, used as the oracle.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "mirrors the float-to-integer truncation of the helper"
)]
fn float_reference(hue: u32, saturation: u32, value: u32) -> Rgb {
    let hue = hue % 360;
    let rgb_max = (value as f32 * 2.55_f32) as u32;
    let rgb_min = ((rgb_max * (100 - saturation)) as f32 / 100.0_f32) as u32;
    let sector = hue / 60;
    let diff = hue % 60;
    let rgb_adj = (rgb_max - rgb_min) * diff / 60;
    let (red, green, blue) = match sector {
        0 => (rgb_max, rgb_min + rgb_adj, rgb_min),
        1 => (rgb_max - rgb_adj, rgb_max, rgb_min),
        2 => (rgb_min, rgb_max, rgb_min + rgb_adj),
        3 => (rgb_min, rgb_max - rgb_adj, rgb_max),
        4 => (rgb_min + rgb_adj, rgb_min, rgb_max),
        _ => (rgb_max, rgb_min, rgb_max - rgb_adj),
    };
    Rgb::new(red as u8, green as u8, blue as u8)
}

#[test]
fn primaries_at_full_saturation_and_value() {
    assert_eq!(hsv_to_rgb(0, 100, 100), Rgb::new(255, 0, 0));
    assert_eq!(hsv_to_rgb(120, 100, 100), Rgb::new(0, 255, 0));
    assert_eq!(hsv_to_rgb(240, 100, 100), Rgb::new(0, 0, 255));
}

#[test]
fn secondaries_at_sector_boundaries() {
    assert_eq!(hsv_to_rgb(60, 100, 100), Rgb::new(255, 255, 0));
    assert_eq!(hsv_to_rgb(180, 100, 100), Rgb::new(0, 255, 255));
    assert_eq!(hsv_to_rgb(300, 100, 100), Rgb::new(255, 0, 255));
}

#[test]
fn ramp_truncates_toward_zero() {
    // adj = 255 * 30 / 60 = 127.5
    assert_eq!(hsv_to_rgb(30, 100, 100), Rgb::new(255, 127, 0));
    assert_eq!(hsv_to_rgb(359, 100, 100), Rgb::new(255, 0, 5));
    // 50 * 2.55 = 127.5
    assert_eq!(hsv_to_rgb(0, 100, 50), Rgb::new(127, 0, 0));
}

#[test]
fn hue_is_periodic() {
    for hue in -720..720 {
        let expected = hsv_to_rgb(hue.rem_euclid(360), 80, 90);
        for turns in [-3, -1, 1, 5] {
            assert_eq!(hsv_to_rgb(hue + 360 * turns, 80, 90), expected, "hue {hue}");
        }
    }
}

#[test]
fn extreme_hues_do_not_overflow() {
    assert_eq!(hsv_to_rgb(i32::MAX, 100, 100), hsv_to_rgb(i32::MAX.rem_euclid(360), 100, 100));
    assert_eq!(hsv_to_rgb(i32::MIN, 100, 100), hsv_to_rgb(i32::MIN.rem_euclid(360), 100, 100));
}

#[test]
fn zero_saturation_is_grey() {
    for hue in 0..360 {
        for value in 0..=100 {
            let rgb = hsv_to_rgb(hue, 0, value);
            assert_eq!(rgb.r, rgb.g);
            assert_eq!(rgb.g, rgb.b);
        }
    }
}

#[test]
fn zero_value_is_black() {
    for hue in 0..360 {
        for saturation in 0..=100 {
            assert_eq!(hsv_to_rgb(hue, saturation, 0), Rgb::new(0, 0, 0));
        }
    }
}

#[test]
fn out_of_range_saturation_and_value_are_clamped() {
    assert_eq!(hsv_to_rgb(200, 255, 100), hsv_to_rgb(200, 100, 100));
    assert_eq!(hsv_to_rgb(200, 100, 101), hsv_to_rgb(200, 100, 100));
    assert_eq!(hsv_to_rgb(45, 150, 200), hsv_to_rgb(45, 100, 100));
}

#[test]
fn brightest_channel_tracks_value() {
    for value in 0..=100_u8 {
        let peak = u8::try_from(u32::from(value) * 255 / 100).expect("peak fits in u8");
        for hue in (0..360).step_by(7) {
            let rgb = hsv_to_rgb(hue, 100, value);
            assert_eq!(rgb.r.max(rgb.g).max(rgb.b), peak, "hue {hue} value {value}");
        }
    }
}

#[test]
fn matches_float_reference_over_whole_domain() {
    for hue in 0..360_u32 {
        for saturation in 0..=100_u32 {
            for value in 0..=100_u32 {
                let actual = hsv_to_rgb(
                    i32::try_from(hue).expect("hue fits"),
                    u8::try_from(saturation).expect("saturation fits"),
                    u8::try_from(value).expect("value fits"),
                );
                assert_eq!(
                    actual,
                    float_reference(hue, saturation, value),
                    "hsv({hue}, {saturation}, {value})"
                );
            }
        }
    }
}

#[test]
fn hsv_type_converts_like_the_function() {
    let hsv = Hsv::new(-90, 40, 70);
    assert_eq!(Rgb::from(hsv), hsv_to_rgb(270, 40, 70));
    assert_eq!(hsv.to_rgb(), hsv_to_rgb(-90, 40, 70));
}
