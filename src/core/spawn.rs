//! # Execution-unit substrate.
//!
//! The pool does not create workers itself; it goes through the [`Spawn`]
//! seam, the "worker-execution primitive supplied by the host platform":
//!
//! - [`Spawn::spawn`] acquires one isolated execution unit and hands it a
//!   future to run. Acquisition is fallible: the substrate may be out of
//!   capacity or refuse the unit.
//! - [`Unit::terminate`] is abrupt, idempotent forced termination of one unit
//!   from the controlling side.
//! - [`Spawn::terminate_all`] is the global best-effort kill used by the
//!   degenerate `join` path when no group handle exists.
//!
//! [`TokioSpawner`] is the default substrate: units are `tokio` tasks, forced
//! termination is `abort`, and the capacity budget is a semaphore whose permit
//! rides inside the spawned future (so both normal return and forced
//! termination release it).

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};

use crate::config::PoolConfig;
use crate::error::SpawnError;

/// The future an execution unit runs to completion (or until terminated).
pub type BoxUnitFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Handle to one acquired execution unit.
///
/// Owned exclusively by the group that acquired it. Dropping the handle does
/// **not** stop the unit; only [`terminate`](Unit::terminate) does.
pub struct Unit {
    handle: JoinHandle<()>,
}

impl Unit {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Force-terminates the unit.
    ///
    /// Abrupt from the unit's point of view: the running future is dropped at
    /// its current await point. Terminating an already-finished unit is a safe
    /// no-op, so callers may terminate unconditionally during teardown.
    pub fn terminate(&self) {
        self.handle.abort();
    }
}

/// Contract for execution-unit substrates.
///
/// Implementations must be safe to call from the controller at any time;
/// `spawn` is invoked sequentially during `start`, `terminate_all` during the
/// degenerate `join` path.
pub trait Spawn: Send + Sync + 'static {
    /// Acquires one execution unit and dispatches `unit` to it.
    ///
    /// Fails when the substrate cannot create another worker; the caller is
    /// responsible for unwinding any units it acquired earlier.
    fn spawn(&self, unit: BoxUnitFuture) -> Result<Unit, SpawnError>;

    /// Best-effort termination of every unit this substrate is still tracking.
    fn terminate_all(&self);

    /// Number of units handed out that have not yet finished or been
    /// terminated.
    fn live_units(&self) -> usize;
}

/// Default substrate: execution units are `tokio` tasks.
///
/// Keeps an abort registry of every unit it hands out so
/// [`terminate_all`](Spawn::terminate_all) can reach units that never made it
/// into a group. Finished entries are pruned lazily on each call.
pub struct TokioSpawner {
    permits: Option<Arc<Semaphore>>,
    limit: usize,
    tracked: Mutex<Vec<AbortHandle>>,
}

impl TokioSpawner {
    /// Creates a spawner with no unit budget.
    pub fn unlimited() -> Self {
        Self {
            permits: None,
            limit: 0,
            tracked: Mutex::new(Vec::new()),
        }
    }

    /// Creates a spawner that hands out at most `limit` live units.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            permits: Some(Arc::new(Semaphore::new(limit))),
            limit,
            tracked: Mutex::new(Vec::new()),
        }
    }

    /// Builds a spawner from the pool configuration (`max_units = 0` → unlimited).
    pub fn from_config(cfg: &PoolConfig) -> Self {
        match cfg.units_limit() {
            Some(limit) => Self::with_limit(limit),
            None => Self::unlimited(),
        }
    }

    fn tracked_mut(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Spawn for TokioSpawner {
    fn spawn(&self, unit: BoxUnitFuture) -> Result<Unit, SpawnError> {
        let permit = match &self.permits {
            Some(sem) => match Arc::clone(sem).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    return Err(SpawnError::CapacityExhausted { limit: self.limit });
                }
            },
            None => None,
        };

        let handle = tokio::spawn(async move {
            // The permit lives exactly as long as the unit, including the
            // forced-termination path (dropping the future drops the permit).
            let _permit = permit;
            unit.await;
        });

        let mut tracked = self.tracked_mut();
        tracked.retain(|h| !h.is_finished());
        tracked.push(handle.abort_handle());

        Ok(Unit::new(handle))
    }

    fn terminate_all(&self) {
        let mut tracked = self.tracked_mut();
        for handle in tracked.drain(..) {
            handle.abort();
        }
    }

    fn live_units(&self) -> usize {
        let mut tracked = self.tracked_mut();
        tracked.retain(|h| !h.is_finished());
        tracked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn stuck_unit() -> BoxUnitFuture {
        Box::pin(async {
            loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        })
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_fails_acquisition() {
        let spawner = TokioSpawner::with_limit(1);

        let first = spawner.spawn(stuck_unit()).expect("first unit fits");
        let second = spawner.spawn(stuck_unit());
        assert!(matches!(
            second,
            Err(SpawnError::CapacityExhausted { limit: 1 })
        ));

        // Terminating the first unit returns its permit.
        first.terminate();
        settle().await;
        assert_eq!(spawner.live_units(), 0);
        spawner.spawn(stuck_unit()).expect("budget freed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_all_clears_tracked_units() {
        let spawner = TokioSpawner::unlimited();
        let _a = spawner.spawn(stuck_unit()).expect("spawn a");
        let _b = spawner.spawn(stuck_unit()).expect("spawn b");
        assert_eq!(spawner.live_units(), 2);

        spawner.terminate_all();
        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_units_are_pruned() {
        let spawner = TokioSpawner::unlimited();
        let _unit = spawner.spawn(Box::pin(async {})).expect("spawn");
        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_is_idempotent() {
        let spawner = TokioSpawner::unlimited();
        let unit = spawner.spawn(Box::pin(async {})).expect("spawn");
        settle().await;

        // Unit already finished on its own; terminating it twice is a no-op.
        unit.terminate();
        unit.terminate();
        assert_eq!(spawner.live_units(), 0);
    }
}
