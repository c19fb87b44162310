//! Task descriptors and slot bindings.
//!
//! - [`worker`]: the [`Worker`] trait and shared [`WorkerRef`] handle;
//! - [`worker_fn`]: closure-backed worker implementation;
//! - [`slot`]: the binding of one worker to one execution unit.

mod slot;
mod worker;
mod worker_fn;

pub use slot::WorkerSlot;
pub use worker::{Worker, WorkerRef};
pub use worker_fn::WorkerFn;
