//! Drives WS2812 LED strips from a Raspberry Pi Pico W, optionally with the Wi-Fi radio up, to
//! reproduce and observe refresh flicker.
//!
//! The color math, sweep, connection state machine, strip handles and refresh statistics are
//! plain `no_std` code and are tested on the host (`--no-default-features --features host`). The
//! PIO strip driver and the Wi-Fi bring-up need the `pico1` feature.
#![cfg_attr(not(test), no_std)]

pub mod connection;
mod error;
mod fmt;
pub mod hsv;
pub mod led_strip;
mod never;
#[cfg(feature = "pico1")]
mod pio_irqs;
pub mod refresh_stats;
pub mod shared_constants;
pub mod sweep;
#[cfg(all(feature = "pico1", feature = "wifi"))]
pub mod wifi;

pub use error::{Error, Result};
pub use never::Never;
