//! # Closure-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! dispatch. Closure capture plays the role of the classic opaque user-data
//! pointer: whatever state the task needs rides inside the closure, exclusively
//! owned by the worker once dispatched.
//!
//! ## Example
//! ```rust
//! use workgroup::{WorkerFn, WorkerRef};
//!
//! let w: WorkerRef = WorkerFn::arc(|| async {
//!     // do work...
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::workers::worker::Worker;

/// Closure-backed worker implementation.
///
/// Wraps a closure that *creates* a new future per dispatch.
#[derive(Debug)]
pub struct WorkerFn<F> {
    f: F,
}

impl<F> WorkerFn<F> {
    /// Creates a new closure-backed worker.
    ///
    /// Prefer [`WorkerFn::arc`] when you immediately need a [`WorkerRef`](crate::WorkerRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the worker and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Worker for WorkerFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(&self) {
        (self.f)().await
    }
}
