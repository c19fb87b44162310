//! # Group ownership and teardown reporting.
//!
//! [`WorkerGroup`] is the owning aggregate behind a handle: the ordered units,
//! the parallel slots, and the shared live counter. Construction either fully
//! succeeds or fully unwinds inside `start`; a partially built group is
//! unrepresentable. Destruction happens through `join`, which is the only
//! authorized teardown path, but the `Drop` impl still terminates any
//! remaining units so that an accidentally dropped handle cannot leak running
//! workers.
//!
//! [`GroupHandle`] is the opaque reference returned to the caller of `start`.
//! It is move-only and confers no access to units, slots, or counter; the only
//! useful thing to do with it is hand it back to `join`.

use std::fmt;
use std::sync::Arc;

use crate::core::alive::AliveCounter;
use crate::core::spawn::Unit;
use crate::workers::WorkerSlot;

/// Teardown phase of a group.
///
/// `start` only ever produces a fully `Running` group; `join` moves it through
/// `Draining` to `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupState {
    /// All units dispatched; workers may be live.
    Running,
    /// `join` is polling the counter.
    Draining,
    /// Every unit was terminated; storage is about to be released.
    Terminated,
}

/// Owning aggregate for one started group.
///
/// Invariant: `units.len() == slots.len()`; every live unit has exactly one
/// dispatched slot.
pub(crate) struct WorkerGroup {
    units: Vec<Unit>,
    slots: Vec<WorkerSlot>,
    counter: Arc<AliveCounter>,
    state: GroupState,
}

impl WorkerGroup {
    pub(crate) fn new(units: Vec<Unit>, slots: Vec<WorkerSlot>, counter: Arc<AliveCounter>) -> Self {
        debug_assert_eq!(units.len(), slots.len());
        Self {
            units,
            slots,
            counter,
            state: GroupState::Running,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn counter(&self) -> &AliveCounter {
        &self.counter
    }

    /// Live workers at this instant.
    pub(crate) fn live(&self) -> usize {
        self.counter.live()
    }

    pub(crate) fn begin_drain(&mut self) {
        self.state = GroupState::Draining;
    }

    /// Force-terminates every unit still registered in the group.
    ///
    /// Idempotent per unit: terminating an already-finished unit is a no-op.
    pub(crate) fn terminate_units(&mut self) {
        for unit in &self.units {
            unit.terminate();
        }
        self.state = GroupState::Terminated;
    }
}

impl Drop for WorkerGroup {
    fn drop(&mut self) {
        // Backstop for handles dropped without join.
        if self.state != GroupState::Terminated {
            for unit in &self.units {
                unit.terminate();
            }
        }
    }
}

/// Opaque reference to a started group.
///
/// Returned by `start`, consumed by `join`. Holding it is not ownership of the
/// workers; it only names the group for later teardown. After `join` the
/// handle is gone and cannot be reused.
pub struct GroupHandle {
    group: WorkerGroup,
}

impl GroupHandle {
    pub(crate) fn new(group: WorkerGroup) -> Self {
        Self { group }
    }

    pub(crate) fn into_group(self) -> WorkerGroup {
        self.group
    }

    /// Number of slots in the group.
    pub fn worker_count(&self) -> usize {
        self.group.len()
    }
}

impl fmt::Debug for GroupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupHandle")
            .field("workers", &self.group.len())
            .finish_non_exhaustive()
    }
}

/// How a `join` call came to return.
///
/// Informational, not an error: every variant means teardown completed and all
/// group storage was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The counter was already zero when `join` was called.
    Idle,
    /// The counter reached zero after `polls` cooperative suspensions.
    Drained {
        /// Number of poll-sleep iterations the drain took.
        polls: u32,
    },
    /// The drain grace elapsed; `live` workers were force-terminated mid-task.
    GraceExceeded {
        /// Workers still live when the escape hatch fired.
        live: usize,
    },
    /// The host's quit signal fired; `live` workers were force-terminated.
    QuitForced {
        /// Workers still live when the quit signal was observed.
        live: usize,
    },
    /// Degenerate path: no handle, globally tracked units terminated
    /// best-effort.
    Untracked,
}

impl DrainOutcome {
    /// True when every worker finished on its own (nothing was terminated
    /// mid-task).
    pub fn is_clean(&self) -> bool {
        matches!(self, DrainOutcome::Idle | DrainOutcome::Drained { .. })
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DrainOutcome::Idle => "drain_idle",
            DrainOutcome::Drained { .. } => "drain_completed",
            DrainOutcome::GraceExceeded { .. } => "drain_grace_exceeded",
            DrainOutcome::QuitForced { .. } => "drain_quit_forced",
            DrainOutcome::Untracked => "drain_untracked",
        }
    }
}
