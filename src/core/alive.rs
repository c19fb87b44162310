//! # Tracks currently alive (running) workers.
//!
//! [`AliveCounter`] is the single piece of state shared between the workers and
//! the controller: an atomic count of workers that have entered but not yet
//! returned from their task body. Workers signal through
//! [`enter`](AliveCounter::enter) / [`leave`](AliveCounter::leave); the
//! controller poll-reads it during the drain.
//!
//! # High-level architecture
//!
//! ```text
//!   dispatch wrapper ──► enter()          (one more worker is live)
//!        task body runs ...
//!   dispatch wrapper ──► leave()          (this worker is done)
//!                          ▲
//!                      is_idle()
//!                          │
//!   ┌──────────────────────┴───────────┐
//!   │  WorkerPool::join (drain loop)   │
//!   └──────────────────────────────────┘
//! ```
//!
//! No locks: many writers (workers) and one reader (the controller, at
//! teardown) go through atomic increment/decrement/read only.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic count of workers currently inside their task body.
///
/// Invariant: `0 <= live() <= capacity()` at every observation point outside a
/// worker's increment/decrement window. The decrement saturates at zero, so no
/// interleaving can drive the counter negative.
pub struct AliveCounter {
    live: AtomicUsize,
    capacity: usize,
}

impl AliveCounter {
    /// Creates a counter for a group of `capacity` slots, initialized to zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            live: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Signals that one more worker has begun executing its task body.
    pub fn enter(&self) {
        let prev = self.live.fetch_add(1, Ordering::SeqCst);
        debug_assert!(
            prev < self.capacity,
            "live count {prev} already at capacity {}",
            self.capacity
        );
    }

    /// Signals that a worker's task body has returned.
    ///
    /// Saturates at zero.
    pub fn leave(&self) {
        let _ = self
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1));
    }

    /// Current number of live workers.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// True when no worker is inside its task body.
    pub fn is_idle(&self) -> bool {
        self.live() == 0
    }

    /// Number of slots this counter was sized for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_enter_leave_round_trip() {
        let counter = AliveCounter::new(2);
        assert!(counter.is_idle());

        counter.enter();
        counter.enter();
        assert_eq!(counter.live(), 2);
        assert!(!counter.is_idle());

        counter.leave();
        counter.leave();
        assert!(counter.is_idle());
    }

    #[test]
    fn test_leave_on_idle_counter_saturates() {
        let counter = AliveCounter::new(1);
        counter.leave();
        counter.leave();
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn test_capacity_is_recorded() {
        let counter = AliveCounter::new(7);
        assert_eq!(counter.capacity(), 7);
    }

    #[test]
    fn test_concurrent_signaling_balances_out() {
        let counter = Arc::new(AliveCounter::new(8));
        let mut threads = Vec::new();

        for _ in 0..8 {
            let c = Arc::clone(&counter);
            threads.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    c.enter();
                    assert!(c.live() <= c.capacity());
                    c.leave();
                }
            }));
        }
        for t in threads {
            t.join().unwrap();
        }

        assert!(counter.is_idle());
    }
}
