use embassy_time::Duration;

use crate::led_strip::{Milliamps, Rgb, wire_time_us};

/// LEDs on every strip. Flicker only shows once a frame spans several PIO FIFO refills.
pub const LED_COUNT: usize = 300;

/// Current budget for one strip. Generous enough that brightness is never capped at 300 LEDs;
/// the strips are expected to run from their own 5 V supply.
pub const LED_CURRENT_BUDGET: Milliamps = Milliamps(18_000);

pub const SWEEP_SATURATION: u8 = 100;
pub const SWEEP_VALUE: u8 = 100;

/// Color of the lower half of every strip; only the upper half sweeps.
pub const HOLD_COLOR: Rgb = Rgb::new(0x80, 0x00, 0x00);

pub const CLEAR_TIMEOUT: Duration = Duration::from_millis(100);
pub const REFRESH_TIMEOUT: Duration = Duration::from_millis(10);
// 10 RTOS ticks at 100 Hz
pub const FRAME_DELAY: Duration = Duration::from_millis(100);

/// Refreshes slower than the wire time plus this slack are counted as late.
pub const REFRESH_SLACK_US: u64 = 500;
pub const REFRESH_BUDGET_US: u64 = wire_time_us(LED_COUNT) + REFRESH_SLACK_US;

/// Reconnect attempts after the first failed join before giving up.
pub const MAX_CONNECT_RETRIES: u8 = 5;
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(1);
/// A join that gets no lease within this long counts as a failed attempt.
pub const DHCP_TIMEOUT: Duration = Duration::from_secs(10);
