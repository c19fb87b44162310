//! # Lifecycle events emitted by the pool and dispatch wrappers.
//!
//! [`EventKind`] classifies event types across three categories:
//! - **Startup events**: group creation flow (starting, started, aborted)
//! - **Worker events**: per-unit task execution (started, finished)
//! - **Teardown events**: drain and termination flow
//!
//! The [`Event`] struct carries additional metadata such as timestamps, unit
//! index, live worker counts, and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of pool lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Startup events ===
    /// Group creation began; units are about to be acquired.
    ///
    /// Sets: `count`.
    GroupStarting,

    /// All units were acquired and dispatched; a handle was returned.
    ///
    /// Sets: `count`.
    GroupStarted,

    /// Acquisition failed mid-startup; already-acquired units were terminated.
    ///
    /// Sets: `index` (the failing unit), `reason`.
    StartAborted,

    // === Worker events ===
    /// A worker incremented the live counter and is entering its task body.
    ///
    /// Sets: `index`.
    WorkerStarted,

    /// A worker's task body returned and the live counter was decremented.
    ///
    /// Sets: `index`.
    WorkerFinished,

    // === Teardown events ===
    /// `join` began draining the group.
    ///
    /// Sets: `count`, `live`.
    DrainStarted,

    /// The live counter reached zero; no forced termination was needed for
    /// running tasks.
    DrainCompleted,

    /// The drain grace elapsed with workers still live; they will be
    /// force-terminated.
    ///
    /// Sets: `live`.
    DrainTimedOut,

    /// The host's quit signal fired during the drain; teardown proceeds
    /// immediately regardless of counter state.
    ///
    /// Sets: `live`.
    QuitForced,

    /// Every unit in the group was terminated and group storage released.
    ///
    /// Sets: `count`.
    GroupTerminated,

    /// Degenerate `join` (no handle): globally tracked units were terminated
    /// best-effort.
    UntrackedTerminated,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Zero-based execution-unit index, if applicable.
    pub index: Option<u32>,
    /// Number of slots in the group, if applicable.
    pub count: Option<u32>,
    /// Live workers observed at the time of the event.
    pub live: Option<u32>,
    /// Human-readable reason (acquisition failures, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            index: None,
            count: None,
            live: None,
            reason: None,
        }
    }

    /// Attaches an execution-unit index.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches the group's slot count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches the observed live-worker count.
    #[inline]
    pub fn with_live(mut self, live: usize) -> Self {
        self.live = Some(live.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::GroupStarting);
        let b = Event::now(EventKind::GroupStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::now(EventKind::StartAborted)
            .with_index(2)
            .with_count(4)
            .with_live(1)
            .with_reason("boom");

        assert_eq!(ev.index, Some(2));
        assert_eq!(ev.count, Some(4));
        assert_eq!(ev.live, Some(1));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
    }
}
