//! Hue/saturation/value to RGB conversion used by the color sweep.
//!
//! See [`hsv_to_rgb`] for the numeric contract.

use crate::led_strip::Rgb;

/// A color in the HSV model, with hue in degrees and saturation/value in percent.
///
/// ```
/// use strip_flicker::hsv::Hsv;
/// use strip_flicker::led_strip::Rgb;
///
/// let rgb: Rgb = Hsv::new(240, 100, 100).into();
/// assert_eq!(rgb, Rgb::new(0, 0, 255));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    /// Degrees. Any value is accepted and wrapped into `0..360`.
    pub hue: i32,
    /// Percent, `0..=100`.
    pub saturation: u8,
    /// Percent, `0..=100`.
    pub value: u8,
}

impl Hsv {
    #[must_use]
    pub const fn new(hue: i32, saturation: u8, value: u8) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Converts to 8-bit-per-channel RGB. See [`hsv_to_rgb`].
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self.hue, self.saturation, self.value)
    }
}

impl From<Hsv> for Rgb {
    fn from(hsv: Hsv) -> Self {
        hsv.to_rgb()
    }
}

/// Converts a hue/saturation/value triple into 8-bit RGB.
///
/// The hue circle is split into six 60° sectors. Within a sector one channel sits at the
/// brightest level, one at the floor level, and the third ramps linearly between the two.
///
/// * `hue` is wrapped with Euclidean modulo 360, so negative hues work too.
/// * `saturation` and `value` are percentages and are clamped to `100`.
///
/// The ramp uses truncating integer division, so results match the classic
/// `led_strip_hsv2rgb` helper bit for bit (e.g. `value = 50` gives a peak of `127`, not `128`).
///
/// ```
/// use strip_flicker::hsv::hsv_to_rgb;
/// use strip_flicker::led_strip::Rgb;
///
/// assert_eq!(hsv_to_rgb(0, 100, 100), Rgb::new(255, 0, 0));
/// assert_eq!(hsv_to_rgb(30, 100, 100), Rgb::new(255, 127, 0));
/// assert_eq!(hsv_to_rgb(-240, 100, 100), Rgb::new(0, 255, 0));
/// ```
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "all operands are bounded: levels <= 255, diff < 60"
)]
pub const fn hsv_to_rgb(hue: i32, saturation: u8, value: u8) -> Rgb {
    let saturation = (if saturation > 100 { 100 } else { saturation }) as u32;
    let value = (if value > 100 { 100 } else { value }) as u32;
    let hue = hue.rem_euclid(360).unsigned_abs();

    // `value * 2.55` truncated. Over 0..=100 the f32 product never lands within
    // rounding distance of an integer from below, so the integer form is exact.
    let rgb_max = value * 255 / 100;
    let rgb_min = rgb_max * (100 - saturation) / 100;

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

    Rgb::new(to_channel(red), to_channel(green), to_channel(blue))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "every level is derived from rgb_max <= 255"
)]
const fn to_channel(level: u32) -> u8 {
    level as u8
}
