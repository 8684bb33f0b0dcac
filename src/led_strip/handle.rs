//! Strip handles and the strip collection.
//!
//! A [`LedStrip`] talks to its driver task through two signals: frames go out on the command
//! signal and the driver echoes each frame's sequence number on the completion signal once the
//! frame is on the wire. Nothing here touches the PIO, so the timeout handling runs on the host
//! against any task that plays the driver's side.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, with_timeout};
use portable_atomic::{AtomicU32, Ordering};

use super::Frame;
use crate::refresh_stats::RefreshStats;
use crate::{Error, Result};

/// One frame for a driver task, tagged so its completion can be told apart from older ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedStripCommand<const N: usize> {
    pub sequence: u32,
    pub frame: Frame<N>,
}

pub type LedStripCommandSignal<const N: usize> =
    Signal<CriticalSectionRawMutex, LedStripCommand<N>>;

/// Carries the sequence number of the frame the driver just finished.
pub type LedStripCompletionSignal = Signal<CriticalSectionRawMutex, u32>;

/// Signals shared between one [`LedStrip`] handle and its driver task.
pub struct LedStripStatic<const N: usize> {
    command_signal: LedStripCommandSignal<N>,
    completion_signal: LedStripCompletionSignal,
}

impl<const N: usize> LedStripStatic<N> {
    #[must_use]
    pub const fn new_static() -> Self {
        Self {
            command_signal: Signal::new(),
            completion_signal: Signal::new(),
        }
    }

    pub const fn command_signal(&'static self) -> &'static LedStripCommandSignal<N> {
        &self.command_signal
    }

    pub const fn completion_signal(&'static self) -> &'static LedStripCompletionSignal {
        &self.completion_signal
    }
}

/// Handle to one WS2812 strip driven by its own task.
///
/// On hardware these come from the wrapper types that
/// [`define_led_strips!`](crate::define_led_strips) generates; those deref to `LedStrip`.
pub struct LedStrip<const N: usize> {
    command_signal: &'static LedStripCommandSignal<N>,
    completion_signal: &'static LedStripCompletionSignal,
    sequence: AtomicU32,
}

impl<const N: usize> LedStrip<N> {
    #[must_use]
    pub const fn new_static() -> LedStripStatic<N> {
        LedStripStatic::new_static()
    }

    #[must_use]
    pub const fn new(led_strip_static: &'static LedStripStatic<N>) -> Self {
        Self {
            command_signal: led_strip_static.command_signal(),
            completion_signal: led_strip_static.completion_signal(),
            sequence: AtomicU32::new(0),
        }
    }

    /// Sends `frame` to the strip and waits until the driver has shifted it out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RefreshTimeout`] if the driver does not finish within `timeout`. The
    /// frame may still be shown later.
    pub async fn refresh(&self, frame: &Frame<N>, timeout: Duration) -> Result<()> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        self.command_signal.signal(LedStripCommand {
            sequence,
            frame: *frame,
        });
        with_timeout(timeout, self.wait_for(sequence))
            .await
            .map_err(|_| Error::RefreshTimeout)
    }

    /// Turns every LED off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RefreshTimeout`] if the blank frame is not sent within `timeout`.
    pub async fn clear(&self, timeout: Duration) -> Result<()> {
        self.refresh(&Frame::new(), timeout).await
    }

    // A frame that timed out can still complete later; skip its sequence number.
    async fn wait_for(&self, sequence: u32) {
        while self.completion_signal.wait().await != sequence {}
    }
}

/// A fixed set of same-length strips refreshed in lockstep.
pub struct LedStrips<const N: usize, const COUNT: usize> {
    strips: [&'static LedStrip<N>; COUNT],
}

impl<const N: usize, const COUNT: usize> LedStrips<N, COUNT> {
    #[must_use]
    pub const fn new(strips: [&'static LedStrip<N>; COUNT]) -> Self {
        Self { strips }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        COUNT
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        COUNT == 0
    }

    /// Clears every strip in order, stopping at the first one that times out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RefreshTimeout`] from the first strip that fails to clear.
    pub async fn clear_all(&self, timeout: Duration) -> Result<()> {
        for (index, strip) in self.strips.iter().enumerate() {
            if let Err(err) = strip.clear(timeout).await {
                error!("strip {}: clear timed out", index);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Shows `frame` on every strip in order and records how long each took.
    ///
    /// A strip that times out is logged and counted, and the remaining strips are still refreshed.
    pub async fn refresh_all(
        &self,
        frame: &Frame<N>,
        timeout: Duration,
        stats: &mut RefreshStats,
    ) {
        for (index, strip) in self.strips.iter().enumerate() {
            let start = Instant::now();
            if strip.refresh(frame, timeout).await.is_ok() {
                let elapsed_us = start.elapsed().as_micros();
                if stats.record(elapsed_us) {
                    warn!("strip {}: late refresh ({} us)", index, elapsed_us);
                }
            } else {
                stats.record_timeout();
                warn!("strip {}: refresh timed out", index);
            }
        }
    }
}
