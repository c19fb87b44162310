//! # workgroup
//!
//! **Workgroup** is a small lifecycle manager for fixed-size groups of
//! background workers, built for cooperative, event-driven hosts that cannot
//! block their own thread waiting for work to finish.
//!
//! A [`WorkerPool`] starts N isolated execution units, each running one
//! [`Worker`] to completion or forever; a shared atomic [`AliveCounter`]
//! tracks how many are in flight; and `join` tears the group down with a
//! drain-then-force-terminate protocol that polls cooperatively instead of
//! blocking.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  WorkerSlot  │   │  WorkerSlot  │   │  WorkerSlot  │
//!     │ (user task 1)│   │ (user task 2)│   │ (user task N)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  WorkerPool (controller)                                          │
//! │  - Spawn substrate (acquires/terminates execution units)          │
//! │  - Bus (broadcast lifecycle events)                               │
//! │  - quit token (host's external-quit signal)                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  exec unit   │   │  exec unit   │   │  exec unit   │
//!     │ enter()      │   │ enter()      │   │ enter()      │
//!     │ task body    │   │ task body    │   │ task body    │
//!     │ leave()      │   │ leave()      │   │ leave()      │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            └─────────────┬────┴───────────┬──────┘
//!                          ▼               ▼
//!                    AliveCounter    Bus ──► SubscriberSet
//!                          ▲
//!                  join() poll loop
//! ```
//!
//! ### Lifecycle
//! ```text
//! start(slots) ──► acquire unit per slot (sequential)
//!   │                 └─ failure at i ──► terminate units 0..i ──► StartError
//!   └──► GroupHandle (opaque; fully populated or nothing)
//!
//! join(Some(handle)):
//!   loop {
//!     ├─► counter == 0      ─► break (Idle / Drained)
//!     ├─► quit cancelled    ─► break (QuitForced)
//!     ├─► drain_grace over  ─► break (GraceExceeded)
//!     └─► sleep(poll_interval)   (yields to the host scheduler)
//!   }
//!   terminate every unit (idempotent) ─► release units/slots/counter
//!
//! join(None):
//!   terminate_all() on the substrate (degenerate best-effort cleanup)
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits            |
//! |-----------------|----------------------------------------------------------|-------------------------------|
//! | **Workers**     | Define tasks as closures or trait impls.                 | [`Worker`], [`WorkerFn`]      |
//! | **Lifecycle**   | Start a group, drain it, force-terminate the stragglers. | [`WorkerPool`], [`GroupHandle`] |
//! | **Substrate**   | Swap the execution-unit platform (tests, embedders).     | [`Spawn`], [`TokioSpawner`]   |
//! | **Observability** | Subscribe to lifecycle events.                         | [`Subscribe`], [`Event`]      |
//! | **Errors**      | Typed startup failures; infallible teardown.             | [`StartError`], [`DrainOutcome`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use workgroup::{PoolConfig, WorkerFn, WorkerPool, WorkerRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut cfg = PoolConfig::default();
//!     cfg.drain_grace = Duration::from_secs(2);
//!
//!     let pool = WorkerPool::new(cfg);
//!
//!     // Workers get no stop signal: they run to completion or are
//!     // force-terminated by join.
//!     let worker: WorkerRef = WorkerFn::arc(|| async {
//!         tokio::time::sleep(Duration::from_millis(50)).await;
//!     });
//!
//!     let handle = pool.start_replicated(2, worker).expect("start");
//!     let outcome = pool.join(Some(handle)).await;
//!     assert!(outcome.is_clean());
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use config::PoolConfig;
pub use core::{
    wait_for_quit_signal, AliveCounter, BoxUnitFuture, DrainOutcome, GroupHandle, PoolBuilder,
    Spawn, TokioSpawner, Unit, WorkerPool,
};
pub use error::{SpawnError, StartError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use workers::{Worker, WorkerFn, WorkerRef, WorkerSlot};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
