//! # Pool configuration.
//!
//! Provides [`PoolConfig`] centralized settings for the worker pool runtime.
//!
//! ## Sentinel values
//! - `max_units = 0` → unlimited (no capacity semaphore created)
//! - `drain_grace = 0s` → no wait: `join` force-terminates immediately

use std::time::Duration;

/// Global configuration for the worker pool.
///
/// Defines:
/// - **Drain behavior**: poll interval and grace bound for the `join` loop
/// - **Capacity**: how many execution units the spawner may hand out
/// - **Event system**: bus capacity for event delivery
///
/// ## Field semantics
/// - `poll_interval`: cooperative suspension between counter checks (min 1ms; clamped)
/// - `drain_grace`: maximum wait for the counter to drain before force-terminating
///   (`0s` = no wait, force immediately)
/// - `max_units`: execution-unit budget (`0` = unlimited)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// How long `join` suspends between counter polls.
    ///
    /// The drain loop yields to the host scheduler for this interval rather
    /// than spin-waiting, so host event processing is never starved.
    pub poll_interval: Duration,

    /// Maximum time `join` waits for the live counter to reach zero.
    ///
    /// When the grace elapses, still-running units are force-terminated
    /// regardless of counter state. `Duration::ZERO` skips the wait entirely.
    pub drain_grace: Duration,

    /// Maximum number of execution units the default spawner will hand out.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = acquisition fails once `n` units are live
    pub max_units: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,
}

impl PoolConfig {
    /// Returns the execution-unit budget as an `Option`.
    ///
    /// - `None` → unlimited (no semaphore)
    /// - `Some(n)` → at most `n` live units
    #[inline]
    pub fn units_limit(&self) -> Option<usize> {
        if self.max_units == 0 {
            None
        } else {
            Some(self.max_units)
        }
    }

    /// Returns the poll interval clamped to a minimum of 1ms.
    ///
    /// A zero interval would turn the drain loop into a busy-wait.
    #[inline]
    pub fn poll_interval_clamped(&self) -> Duration {
        self.poll_interval.max(Duration::from_millis(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `poll_interval = 10ms`
    /// - `drain_grace = 60s`
    /// - `max_units = 0` (unlimited)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            drain_grace: Duration::from_secs(60),
            max_units: 0,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_units_means_unlimited() {
        let mut cfg = PoolConfig::default();
        assert_eq!(cfg.units_limit(), None);

        cfg.max_units = 4;
        assert_eq!(cfg.units_limit(), Some(4));
    }

    #[test]
    fn test_poll_interval_clamped_to_one_ms() {
        let mut cfg = PoolConfig::default();
        cfg.poll_interval = Duration::ZERO;
        assert_eq!(cfg.poll_interval_clamped(), Duration::from_millis(1));

        cfg.poll_interval = Duration::from_millis(25);
        assert_eq!(cfg.poll_interval_clamped(), Duration::from_millis(25));
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let mut cfg = PoolConfig::default();
        cfg.bus_capacity = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
