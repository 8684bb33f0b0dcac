//! Host-level tests for frames and brightness limiting.
#![cfg(feature = "host")]

use strip_flicker::led_strip::{
    Frame, MILLIAMPS_PER_LED, Milliamps, Rgb, apply_max_brightness, colors, scale_brightness,
};
use strip_flicker::shared_constants::{LED_COUNT, LED_CURRENT_BUDGET};

#[test]
fn new_frame_is_black() {
    let frame = Frame::<4>::new();
    assert!(frame.iter().all(|&pixel| pixel == colors::BLACK));
    assert_eq!(Frame::<4>::len(), 4);
    assert_eq!(Frame::<4>::default(), frame);
}

#[test]
fn filled_and_array_conversions() {
    let frame = Frame::<3>::filled(colors::RED);
    let array: [Rgb; 3] = frame.into();
    assert_eq!(array, [colors::RED; 3]);
    assert_eq!(Frame::from(array), frame);
}

#[test]
fn max_brightness_from_budget() {
    // 8 LEDs * 60 mA = 480 mA worst case; 50 mA allows 50 * 255 / 480 = 26
    assert_eq!(Milliamps(50).max_brightness(8), 26);
    assert_eq!(Milliamps(480).max_brightness(8), 255);
    assert_eq!(Milliamps(10_000).max_brightness(8), 255);
    assert_eq!(Milliamps(0).max_brightness(8), 0);
    assert_eq!(Milliamps(0).max_brightness(0), 255);
}

#[test]
fn demo_budget_leaves_full_brightness() {
    assert!(LED_CURRENT_BUDGET.as_u32() >= u32::try_from(LED_COUNT).expect("fits") * MILLIAMPS_PER_LED);
    assert_eq!(LED_CURRENT_BUDGET.max_brightness(LED_COUNT), u8::MAX);
}

#[test]
fn scale_brightness_endpoints() {
    assert_eq!(scale_brightness(255, 255), 255);
    assert_eq!(scale_brightness(255, 0), 0);
    assert_eq!(scale_brightness(0, 200), 0);
    assert_eq!(scale_brightness(200, 128), 100);
}

#[test]
fn full_brightness_leaves_frame_untouched() {
    let mut frame = Frame::<3>::from([Rgb::new(1, 2, 3), Rgb::new(250, 128, 7), colors::WHITE]);
    let before = frame;
    apply_max_brightness(&mut frame, u8::MAX);
    assert_eq!(frame, before);
}

#[test]
fn capped_brightness_scales_every_channel() {
    let mut frame = Frame::<2>::from([colors::WHITE, Rgb::new(255, 0, 51)]);
    apply_max_brightness(&mut frame, 51);
    assert_eq!(*frame, [Rgb::new(51, 51, 51), Rgb::new(51, 0, 10)]);
}
