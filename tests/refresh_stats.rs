//! Host-level tests for refresh latency statistics.
#![cfg(feature = "host")]

use strip_flicker::led_strip::wire_time_us;
use strip_flicker::refresh_stats::RefreshStats;
use strip_flicker::shared_constants::{LED_COUNT, REFRESH_BUDGET_US, REFRESH_TIMEOUT};

#[test]
fn empty_window() {
    let stats = RefreshStats::new(1_000);
    assert_eq!(stats.refreshes(), 0);
    assert_eq!(stats.late(), 0);
    assert_eq!(stats.timeouts(), 0);
    assert_eq!(stats.worst_us(), 0);
    assert_eq!(stats.mean_us(), 0);
}

#[test]
fn late_means_strictly_over_budget() {
    let mut stats = RefreshStats::new(1_000);
    assert!(!stats.record(999));
    assert!(!stats.record(1_000));
    assert!(stats.record(1_001));
    assert_eq!(stats.refreshes(), 3);
    assert_eq!(stats.late(), 1);
}

#[test]
fn mean_and_worst() {
    let mut stats = RefreshStats::new(10_000);
    for elapsed_us in [9_000, 9_100, 9_200, 12_001] {
        stats.record(elapsed_us);
    }
    assert_eq!(stats.worst_us(), 12_001);
    assert_eq!(stats.mean_us(), (9_000 + 9_100 + 9_200 + 12_001) / 4);
}

#[test]
fn timeouts_are_counted_separately() {
    let mut stats = RefreshStats::new(1_000);
    stats.record(500);
    stats.record_timeout();
    stats.record_timeout();
    assert_eq!(stats.refreshes(), 1);
    assert_eq!(stats.timeouts(), 2);
    assert_eq!(stats.mean_us(), 500);
}

#[test]
fn reset_keeps_budget() {
    let mut stats = RefreshStats::new(1_234);
    stats.record(5_000);
    stats.record_timeout();
    stats.reset();
    assert_eq!(stats, RefreshStats::new(1_234));
    assert_eq!(stats.budget_us(), 1_234);
}

#[test]
fn budget_fits_wire_time_and_timeout() {
    assert_eq!(wire_time_us(LED_COUNT), 9_055);
    assert!(REFRESH_BUDGET_US > wire_time_us(LED_COUNT));
    assert!(REFRESH_BUDGET_US < REFRESH_TIMEOUT.as_micros());
}
