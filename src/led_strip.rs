//! A device abstraction for WS2812-style LED strips.
//!
//! The frame and brightness types, the [`LedStrip`] handles and the [`LedStrips`] collection
//! build on any target. The PIO bus and the driver loop live in [`strip`] and need the `pico1`
//! feature. See [`define_led_strips!`](crate::define_led_strips) for the main usage example.

mod handle;
#[cfg(feature = "pico1")]
pub mod strip;

pub use handle::{
    LedStrip, LedStripCommand, LedStripCommandSignal, LedStripCompletionSignal, LedStripStatic,
    LedStrips,
};
#[cfg(feature = "pico1")]
pub use strip::{LedStripPio, PioBus, PioStateMachine, led_strip_driver_loop};

use smart_leds::RGB8;
/// RGB color constants.
pub use smart_leds::colors;

/// RGB color representation re-exported from `smart_leds`.
pub type Rgb = RGB8;

/// Worst-case draw of one WS2812B LED at full white.
pub const MILLIAMPS_PER_LED: u32 = 60;

// 24 bits at 800 kHz, plus the latch gap that ends a frame.
const WIRE_TIME_PER_LED_US: u64 = 30;
const RESET_DELAY_US: u64 = 55;

/// Frame of `Rgb` values for a 1D LED strip.
///
/// Frames deref to `[Rgb; N]`, so you can mutate pixels directly before handing them to a strip.
///
/// ```
/// use strip_flicker::led_strip::{Frame, colors};
///
/// let mut frame = Frame::<8>::new();
/// frame[0] = colors::RED;
/// frame[7] = colors::GREEN;
/// assert_eq!(frame[1], colors::BLACK);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<const N: usize>(pub [Rgb; N]);

impl<const N: usize> Frame<N> {
    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([Rgb::new(0, 0, 0); N])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: Rgb) -> Self {
        Self([color; N])
    }

    /// Get the number of LEDs in this frame.
    #[must_use]
    pub const fn len() -> usize {
        N
    }
}

impl<const N: usize> core::ops::Deref for Frame<N> {
    type Target = [Rgb; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> core::ops::DerefMut for Frame<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[Rgb; N]> for Frame<N> {
    fn from(array: [Rgb; N]) -> Self {
        Self(array)
    }
}

impl<const N: usize> From<Frame<N>> for [Rgb; N] {
    fn from(frame: Frame<N>) -> Self {
        frame.0
    }
}

impl<const N: usize> Default for Frame<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Current budget for LED strips, specified in milliamps.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Milliamps(pub u16);

impl Milliamps {
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0 as u32
    }

    /// Brightness cap (0-255) that keeps `led_count` LEDs at full white within this budget.
    ///
    /// ```
    /// use strip_flicker::led_strip::Milliamps;
    ///
    /// assert_eq!(Milliamps(50).max_brightness(8), 26);
    /// assert_eq!(Milliamps(18_000).max_brightness(300), 255);
    /// ```
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "u16 budget * 255 fits in u32; zero-length strips get full brightness"
    )]
    pub const fn max_brightness(self, led_count: usize) -> u8 {
        let worst_case_ma = led_count as u32 * MILLIAMPS_PER_LED;
        if worst_case_ma == 0 {
            return u8::MAX;
        }
        let scale = (self.as_u32() * 255) / worst_case_ma;
        if scale > 255 { 255 } else { scale as u8 }
    }
}

/// Time the data line needs to shift out `led_count` pixels and latch them.
///
/// A refresh that takes noticeably longer than this was stalled somewhere between the CPU and the
/// pin, which is what shows up as flicker.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "strip lengths are far below u64 overflow"
)]
pub const fn wire_time_us(led_count: usize) -> u64 {
    led_count as u64 * WIRE_TIME_PER_LED_US + RESET_DELAY_US
}

/// Scale a single color component by brightness (0-255).
#[inline]
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    clippy::cast_possible_truncation,
    reason = "product of two u8 divided by 255 fits in u8"
)]
pub const fn scale_brightness(value: u8, brightness: u8) -> u8 {
    ((value as u16 * brightness as u16) / 255) as u8
}

/// Applies a brightness cap to an entire frame in place.
pub fn apply_max_brightness<const N: usize>(frame: &mut Frame<N>, max_brightness: u8) {
    if max_brightness == u8::MAX {
        return;
    }
    for color in frame.iter_mut() {
        *color = Rgb::new(
            scale_brightness(color.r, max_brightness),
            scale_brightness(color.g, max_brightness),
            scale_brightness(color.b, max_brightness),
        );
    }
}
