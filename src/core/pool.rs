//! # WorkerPool: the two entry points the host calls.
//!
//! The [`WorkerPool`] owns the event bus, the execution-unit substrate, and
//! the host's quit token. It exposes exactly the surface the external shell
//! consumes: `start` at host init, `join` at host cleanup.
//!
//! ## Key responsibilities
//! - acquire N execution units **sequentially**, unwinding fully on the first
//!   failure (a partial group is never returned)
//! - wire the live counter into every dispatch wrapper **before** any unit is
//!   spawned, so a worker can never finish before the counter exists
//! - drain cooperatively at teardown: poll the counter, yield between polls,
//!   and bound the wait with the quit token and the configured grace
//!
//! ## High-level architecture
//! ```text
//! start(slots):
//!   slots[0]   slots[1]   ...  slots[N-1]
//!     │          │                │
//!     └──► dispatch wrapper (enter → task body → leave)
//!                │
//!          Spawn::spawn  ──fail at i──► terminate units 0..i, StartError
//!                │
//!          GroupHandle (opaque, fully populated)
//!
//! join(Some(handle)):                        join(None):
//!   ┌────────────────────────────┐             Spawn::terminate_all()
//!   │ loop:                      │             (degenerate best-effort)
//!   │   counter == 0 ? ── break  │
//!   │   quit fired   ? ── break  │
//!   │   grace over   ? ── break  │
//!   │   sleep(poll_interval)     │
//!   └──────────────┬─────────────┘
//!                  ▼
//!        terminate every unit (idempotent)
//!        release units + slots + counter
//! ```
//!
//! ## Rules
//! - The counter is the **only** state shared with workers; everything else a
//!   worker owns rides inside its closure.
//! - Workers get no stop signal; forced termination is abrupt.
//! - `join` never fails; it reports which exit bounded the drain via
//!   [`DrainOutcome`].

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::config::PoolConfig;
use crate::core::alive::AliveCounter;
use crate::core::group::{DrainOutcome, GroupHandle, WorkerGroup};
use crate::core::spawn::{BoxUnitFuture, Spawn, TokioSpawner};
use crate::error::StartError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::workers::{WorkerRef, WorkerSlot};

/// Builder for constructing a pool with optional seams.
pub struct PoolBuilder {
    cfg: PoolConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    spawner: Option<Arc<dyn Spawn>>,
}

impl PoolBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: PoolConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            spawner: None,
        }
    }

    /// Sets event subscribers for observability.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the execution-unit substrate.
    ///
    /// Defaults to [`TokioSpawner`] configured from `cfg.max_units`.
    pub fn with_spawner(mut self, spawner: Arc<dyn Spawn>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Builds the pool.
    ///
    /// Must run inside a tokio runtime if subscribers were provided (their
    /// fan-out workers are spawned here).
    pub fn build(self) -> WorkerPool {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let spawner = self
            .spawner
            .unwrap_or_else(|| Arc::new(TokioSpawner::from_config(&self.cfg)));

        let pool = WorkerPool {
            cfg: self.cfg,
            bus,
            spawner,
            subs: Arc::new(SubscriberSet::new(self.subscribers)),
            quit: CancellationToken::new(),
        };
        if !pool.subs.is_empty() {
            pool.subscriber_listener();
        }
        pool
    }
}

/// Controller for fixed-size worker groups.
///
/// One pool can start and join any number of groups over its life; each group
/// is independent and owns its own units, slots, and counter.
pub struct WorkerPool {
    cfg: PoolConfig,
    bus: Bus,
    spawner: Arc<dyn Spawn>,
    subs: Arc<SubscriberSet>,
    quit: CancellationToken,
}

impl WorkerPool {
    /// Returns a builder for a pool with the given configuration.
    pub fn builder(cfg: PoolConfig) -> PoolBuilder {
        PoolBuilder::new(cfg)
    }

    /// Creates a pool with all defaults (no subscribers, [`TokioSpawner`]).
    pub fn new(cfg: PoolConfig) -> Self {
        Self::builder(cfg).build()
    }

    /// Clone of the host's quit token.
    ///
    /// Cancelling it makes an in-progress (or future) `join` force-terminate
    /// immediately regardless of counter state.
    pub fn quit_token(&self) -> CancellationToken {
        self.quit.clone()
    }

    /// Creates a raw receiver for lifecycle events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Starts a group with one slot per entry of `slots`.
    ///
    /// Units are acquired sequentially. If acquisition of unit `i` fails, the
    /// `i` already-acquired units are terminated, all storage is released, and
    /// the failure is returned; the caller never sees a partial group.
    ///
    /// On success the returned [`GroupHandle`] stays valid until handed to
    /// [`join`](WorkerPool::join).
    pub fn start(&self, slots: Vec<WorkerSlot>) -> Result<GroupHandle, StartError> {
        if slots.is_empty() {
            return Err(StartError::EmptyGroup);
        }
        let count = slots.len();
        self.bus
            .publish(Event::now(EventKind::GroupStarting).with_count(count));

        // Shared with every wrapper before anything is spawned: a worker can
        // never observe a missing counter, however fast it finishes.
        let counter = Arc::new(AliveCounter::new(count));

        let mut units = Vec::with_capacity(count);
        for (index, slot) in slots.iter().enumerate() {
            let wrapper = dispatch(
                slot.worker().cloned(),
                Arc::clone(&counter),
                self.bus.clone(),
                index,
            );
            match self.spawner.spawn(wrapper) {
                Ok(unit) => units.push(unit),
                Err(source) => {
                    for unit in &units {
                        unit.terminate();
                    }
                    self.bus.publish(
                        Event::now(EventKind::StartAborted)
                            .with_index(index)
                            .with_reason(source.to_string()),
                    );
                    return Err(StartError::Spawn { index, source });
                }
            }
        }

        self.bus
            .publish(Event::now(EventKind::GroupStarted).with_count(count));
        Ok(GroupHandle::new(WorkerGroup::new(units, slots, counter)))
    }

    /// Starts a group of `count` slots all running the same worker.
    pub fn start_replicated(
        &self,
        count: usize,
        worker: WorkerRef,
    ) -> Result<GroupHandle, StartError> {
        if count == 0 {
            return Err(StartError::EmptyGroup);
        }
        let slots = (0..count)
            .map(|_| WorkerSlot::new(Arc::clone(&worker)))
            .collect();
        self.start(slots)
    }

    /// Tears a group down: drain, then force-terminate, then release.
    ///
    /// With a handle, waits cooperatively for the live counter to reach zero
    /// (bounded by the quit token and `cfg.drain_grace`), then terminates
    /// every unit still registered in the group and drops all group storage.
    ///
    /// Without a handle (`None`), performs a best-effort termination of every
    /// unit the substrate still tracks globally, with no counter wait. This is
    /// the cleanup path for a `start` that never produced a group.
    ///
    /// Never fails; the returned [`DrainOutcome`] says which exit bounded the
    /// drain.
    pub async fn join(&self, handle: Option<GroupHandle>) -> DrainOutcome {
        let Some(handle) = handle else {
            self.spawner.terminate_all();
            self.bus.publish(Event::now(EventKind::UntrackedTerminated));
            return DrainOutcome::Untracked;
        };

        let mut group = handle.into_group();
        group.begin_drain();
        self.bus.publish(
            Event::now(EventKind::DrainStarted)
                .with_count(group.len())
                .with_live(group.live()),
        );

        let outcome = self.drain(&group).await;

        group.terminate_units();
        self.bus
            .publish(Event::now(EventKind::GroupTerminated).with_count(group.len()));
        outcome
        // `group` drops here: units, slots, counter all released.
    }

    /// Cooperative poll loop, bounded by three exits checked in order:
    /// counter drained, quit signal, grace elapsed.
    async fn drain(&self, group: &WorkerGroup) -> DrainOutcome {
        if group.counter().is_idle() {
            self.bus.publish(Event::now(EventKind::DrainCompleted));
            return DrainOutcome::Idle;
        }

        let poll = self.cfg.poll_interval_clamped();
        let deadline = time::Instant::now() + self.cfg.drain_grace;
        let mut polls: u32 = 0;

        loop {
            if group.counter().is_idle() {
                self.bus.publish(Event::now(EventKind::DrainCompleted));
                return DrainOutcome::Drained { polls };
            }
            if self.quit.is_cancelled() {
                let live = group.live();
                self.bus
                    .publish(Event::now(EventKind::QuitForced).with_live(live));
                return DrainOutcome::QuitForced { live };
            }
            if time::Instant::now() >= deadline {
                let live = group.live();
                self.bus
                    .publish(Event::now(EventKind::DrainTimedOut).with_live(live));
                return DrainOutcome::GraceExceeded { live };
            }

            polls = polls.saturating_add(1);
            select! {
                _ = time::sleep(poll) => {}
                _ = self.quit.cancelled() => {}
            }
        }
    }
}

/// The future actually handed to the substrate: the user task body bracketed
/// by counter signaling.
///
/// An empty slot returns immediately without incrementing, so it can never
/// leave a dangling decrement behind.
fn dispatch(
    worker: Option<WorkerRef>,
    counter: Arc<AliveCounter>,
    bus: Bus,
    index: usize,
) -> BoxUnitFuture {
    Box::pin(async move {
        let Some(worker) = worker else {
            return;
        };

        counter.enter();
        bus.publish(Event::now(EventKind::WorkerStarted).with_index(index));

        worker.run().await;

        counter.leave();
        bus.publish(Event::now(EventKind::WorkerFinished).with_index(index));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::core::spawn::Unit;
    use crate::error::SpawnError;
    use crate::workers::WorkerFn;

    /// Substrate that rejects acquisition at a fixed call index, delegating to
    /// a real [`TokioSpawner`] otherwise.
    struct RejectingSpawner {
        inner: TokioSpawner,
        fail_at: usize,
        calls: AtomicUsize,
    }

    impl RejectingSpawner {
        fn new(fail_at: usize) -> Self {
            Self {
                inner: TokioSpawner::unlimited(),
                fail_at,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Spawn for RejectingSpawner {
        fn spawn(&self, unit: BoxUnitFuture) -> Result<Unit, SpawnError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_at {
                return Err(SpawnError::Rejected {
                    reason: "injected failure".into(),
                });
            }
            self.inner.spawn(unit)
        }

        fn terminate_all(&self) {
            self.inner.terminate_all();
        }

        fn live_units(&self) -> usize {
            self.inner.live_units()
        }
    }

    fn test_cfg() -> PoolConfig {
        PoolConfig {
            poll_interval: Duration::from_millis(10),
            drain_grace: Duration::from_millis(200),
            ..PoolConfig::default()
        }
    }

    fn pool_with(spawner: Arc<dyn Spawn>) -> WorkerPool {
        WorkerPool::builder(test_cfg()).with_spawner(spawner).build()
    }

    fn noop_worker() -> WorkerRef {
        WorkerFn::arc(|| async {})
    }

    fn napping_worker(ms: u64) -> WorkerRef {
        WorkerFn::arc(move || async move {
            time::sleep(Duration::from_millis(ms)).await;
        })
    }

    fn stuck_worker() -> WorkerRef {
        WorkerFn::arc(|| async {
            loop {
                time::sleep(Duration::from_secs(3600)).await;
            }
        })
    }

    /// Lets spawned units reach their next await point on the paused clock.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_zero_workers_rejected_before_any_acquisition() {
        let spawner = Arc::new(RejectingSpawner::new(usize::MAX));
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        assert!(matches!(pool.start(Vec::new()), Err(StartError::EmptyGroup)));
        assert!(matches!(
            pool.start_replicated(0, noop_worker()),
            Err(StartError::EmptyGroup)
        ));
        assert_eq!(spawner.calls(), 0, "no unit may be acquired");
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_workers_drain_as_idle() {
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        let handle = pool.start_replicated(2, noop_worker()).expect("start");
        settle().await; // both workers enter and leave

        let outcome = pool.join(Some(handle)).await;
        assert_eq!(outcome, DrainOutcome::Idle);
        assert!(outcome.is_clean());

        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_observes_zero_within_bounded_polls() {
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        let handle = pool.start_replicated(2, napping_worker(30)).expect("start");
        settle().await; // both workers are now inside their nap

        match pool.join(Some(handle)).await {
            DrainOutcome::Drained { polls } => {
                assert!(polls >= 1);
                assert!(polls <= 8, "drain took {polls} polls for a 30ms task");
            }
            other => panic!("expected Drained, got {other:?}"),
        }

        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_worker_terminated_once_grace_elapses() {
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        let slots = vec![
            WorkerSlot::new(napping_worker(30)),
            WorkerSlot::new(napping_worker(30)),
            WorkerSlot::new(stuck_worker()),
        ];
        let handle = pool.start(slots).expect("start");
        settle().await;

        let outcome = pool.join(Some(handle)).await;
        assert_eq!(outcome, DrainOutcome::GraceExceeded { live: 1 });
        assert!(!outcome.is_clean());

        settle().await;
        assert_eq!(spawner.live_units(), 0, "stuck unit must be terminated");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_grace_degrades_to_unconditional_terminate() {
        let mut cfg = test_cfg();
        cfg.drain_grace = Duration::ZERO;
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = WorkerPool::builder(cfg)
            .with_spawner(Arc::clone(&spawner) as Arc<dyn Spawn>)
            .build();

        let handle = pool.start_replicated(1, stuck_worker()).expect("start");
        settle().await;

        let outcome = pool.join(Some(handle)).await;
        assert_eq!(outcome, DrainOutcome::GraceExceeded { live: 1 });

        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_signal_bounds_the_drain_before_grace() {
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        let handle = pool.start_replicated(1, stuck_worker()).expect("start");
        settle().await;

        pool.quit_token().cancel();
        let before = time::Instant::now();
        let outcome = pool.join(Some(handle)).await;

        assert_eq!(outcome, DrainOutcome::QuitForced { live: 1 });
        assert!(
            before.elapsed() < test_cfg().drain_grace,
            "quit must preempt the grace wait"
        );

        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_failure_unwinds_already_acquired_units() {
        let spawner = Arc::new(RejectingSpawner::new(2));
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        let err = pool
            .start_replicated(4, stuck_worker())
            .expect_err("unit 2 must fail");
        match err {
            StartError::Spawn { index, .. } => assert_eq!(index, 2),
            other => panic!("expected Spawn, got {other:?}"),
        }

        // Units 0 and 1 were acquired, unit 2 failed, unit 3 was never tried.
        assert_eq!(spawner.calls(), 3);
        settle().await;
        assert_eq!(spawner.live_units(), 0, "acquired units must be unwound");
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_without_handle_is_safe_and_kills_tracked_units() {
        let spawner = Arc::new(RejectingSpawner::new(1));
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        // Nothing tracked yet: degenerate join is a clean no-op.
        assert_eq!(pool.join(None).await, DrainOutcome::Untracked);

        // A failed start unwinds its own units; the degenerate join afterwards
        // stays safe and leaves nothing running.
        let _ = pool
            .start_replicated(3, stuck_worker())
            .expect_err("unit 1 must fail");
        assert_eq!(pool.join(None).await, DrainOutcome::Untracked);
        assert_eq!(pool.join(None).await, DrainOutcome::Untracked);

        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_slots_dispatch_as_noops() {
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);
        let mut rx = pool.subscribe();

        let handle = pool
            .start(vec![WorkerSlot::empty(), WorkerSlot::empty()])
            .expect("start");
        assert_eq!(handle.worker_count(), 2);
        settle().await;

        assert_eq!(pool.join(Some(handle)).await, DrainOutcome::Idle);

        while let Ok(ev) = rx.try_recv() {
            assert_ne!(
                ev.kind,
                EventKind::WorkerStarted,
                "empty slots must never touch the counter"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_count_stays_within_group_size() {
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);
        let mut rx = pool.subscribe();

        let handle = pool.start_replicated(3, napping_worker(30)).expect("start");
        settle().await;
        pool.join(Some(handle)).await;

        let mut started = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::WorkerStarted {
                started += 1;
            }
            if let Some(live) = ev.live {
                assert!(live <= 3, "live={live} exceeds group size");
            }
        }
        assert_eq!(started, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_terminates_units() {
        let spawner = Arc::new(TokioSpawner::unlimited());
        let pool = pool_with(Arc::clone(&spawner) as Arc<dyn Spawn>);

        let handle = pool.start_replicated(2, stuck_worker()).expect("start");
        settle().await;
        assert_eq!(spawner.live_units(), 2);

        drop(handle);
        settle().await;
        assert_eq!(spawner.live_units(), 0);
    }
}
