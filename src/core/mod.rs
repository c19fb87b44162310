//! Runtime core: group lifecycle and ownership.
//!
//! Internal modules:
//! - [`alive`]: the atomic live-worker counter shared with dispatch wrappers;
//! - [`spawn`]: the execution-unit substrate seam and its tokio implementation;
//! - [`group`]: the owning aggregate behind a group handle;
//! - [`pool`]: the `start`/`join` controller;
//! - [`shutdown`]: cross-platform quit-signal handling for host shells.

mod alive;
mod group;
mod pool;
mod shutdown;
mod spawn;

pub use alive::AliveCounter;
pub use group::{DrainOutcome, GroupHandle};
pub use pool::{PoolBuilder, WorkerPool};
pub use shutdown::wait_for_quit_signal;
pub use spawn::{BoxUnitFuture, Spawn, TokioSpawner, Unit};
