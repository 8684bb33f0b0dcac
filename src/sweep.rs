//! The demo's color sweep: a hue cursor walking the color wheel one degree per frame, and the
//! half-held / half-sweeping frame layout.

use crate::hsv::hsv_to_rgb;
use crate::led_strip::{Frame, Rgb};
use crate::shared_constants::{SWEEP_SATURATION, SWEEP_VALUE};

/// Degrees in one turn of the color wheel.
pub const HUE_TURN: i32 = 360;

/// Hue cursor that advances one degree per frame and wraps at a full turn.
///
/// The cursor is incremented before it is read, so a sweep started at hue 0 emits 1, 2, ...,
/// 359, 0, 1, ...
///
/// ```
/// use strip_flicker::sweep::HueSweep;
///
/// let mut sweep = HueSweep::new();
/// assert_eq!(sweep.advance(), 1);
/// assert_eq!(sweep.by_ref().take(358).last(), Some(359));
/// assert_eq!(sweep.advance(), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HueSweep {
    hue: i32,
}

impl HueSweep {
    #[must_use]
    pub const fn new() -> Self {
        Self { hue: 0 }
    }

    /// Starts at `hue` (wrapped into `0..360`); the first [`advance`](Self::advance) returns
    /// the following degree.
    #[must_use]
    pub const fn starting_at(hue: i32) -> Self {
        Self {
            hue: hue.rem_euclid(HUE_TURN),
        }
    }

    #[must_use]
    pub const fn hue(&self) -> i32 {
        self.hue
    }

    /// Moves to the next degree and returns it.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "hue stays below HUE_TURN"
    )]
    pub const fn advance(&mut self) -> i32 {
        self.hue = if self.hue >= HUE_TURN - 1 {
            0
        } else {
            self.hue + 1
        };
        self.hue
    }
}

impl Iterator for HueSweep {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }
}

/// Fully saturated, full-value color for `hue`.
#[must_use]
pub const fn sweep_color(hue: i32) -> Rgb {
    hsv_to_rgb(hue, SWEEP_SATURATION, SWEEP_VALUE)
}

/// Writes `hold` to the lower half of the frame, middle pixel included, and `sweep` to the rest.
///
/// ```
/// use strip_flicker::led_strip::{Frame, colors};
/// use strip_flicker::sweep::fill_split_frame;
///
/// let mut frame = Frame::<5>::new();
/// fill_split_frame(&mut frame, colors::BLUE, colors::RED);
/// assert_eq!(*frame, [colors::RED, colors::RED, colors::RED, colors::BLUE, colors::BLUE]);
/// ```
pub fn fill_split_frame<const N: usize>(frame: &mut Frame<N>, sweep: Rgb, hold: Rgb) {
    let middle = N / 2;
    for (index, pixel) in frame.iter_mut().enumerate() {
        *pixel = if index > middle { sweep } else { hold };
    }
}

/// Number of pixels [`fill_split_frame`] gives the hold color.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "N / 2 + 1 cannot overflow"
)]
pub const fn hold_pixel_count(len: usize) -> usize {
    if len == 0 { 0 } else { len / 2 + 1 }
}
