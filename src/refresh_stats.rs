//! Refresh latency bookkeeping.
//!
//! Flicker shows up as strip refreshes that take longer than the data line needs. The demo
//! records every refresh here and logs a summary once per hue turn.

/// Running statistics over a window of strip refreshes, in microseconds.
///
/// ```
/// use strip_flicker::refresh_stats::RefreshStats;
///
/// let mut stats = RefreshStats::new(10_000);
/// assert!(!stats.record(9_100));
/// assert!(stats.record(12_000));
/// assert_eq!(stats.late(), 1);
/// assert_eq!(stats.worst_us(), 12_000);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshStats {
    budget_us: u64,
    refreshes: u32,
    late: u32,
    timeouts: u32,
    worst_us: u64,
    total_us: u64,
}

impl RefreshStats {
    #[must_use]
    pub const fn new(budget_us: u64) -> Self {
        Self {
            budget_us,
            refreshes: 0,
            late: 0,
            timeouts: 0,
            worst_us: 0,
            total_us: 0,
        }
    }

    /// Records one completed refresh. Returns `true` if it took longer than the budget.
    pub const fn record(&mut self, elapsed_us: u64) -> bool {
        self.refreshes = self.refreshes.saturating_add(1);
        self.total_us = self.total_us.saturating_add(elapsed_us);
        if elapsed_us > self.worst_us {
            self.worst_us = elapsed_us;
        }
        let is_late = elapsed_us > self.budget_us;
        if is_late {
            self.late = self.late.saturating_add(1);
        }
        is_late
    }

    /// Records a refresh that never completed.
    pub const fn record_timeout(&mut self) {
        self.timeouts = self.timeouts.saturating_add(1);
    }

    #[must_use]
    pub const fn budget_us(&self) -> u64 {
        self.budget_us
    }

    /// Completed refreshes in this window. Timeouts are not counted here.
    #[must_use]
    pub const fn refreshes(&self) -> u32 {
        self.refreshes
    }

    #[must_use]
    pub const fn late(&self) -> u32 {
        self.late
    }

    #[must_use]
    pub const fn timeouts(&self) -> u32 {
        self.timeouts
    }

    #[must_use]
    pub const fn worst_us(&self) -> u64 {
        self.worst_us
    }

    /// Mean duration of completed refreshes, truncated. Zero for an empty window.
    #[must_use]
    pub const fn mean_us(&self) -> u64 {
        match self.total_us.checked_div(self.refreshes as u64) {
            Some(mean) => mean,
            None => 0,
        }
    }

    /// Starts a new window, keeping the budget.
    pub const fn reset(&mut self) {
        *self = Self::new(self.budget_us);
    }
}
