//! # Worker abstraction.
//!
//! This module defines the [`Worker`] trait, the unit of work a pool dispatches
//! to an execution unit. The common handle type is [`WorkerRef`], an
//! `Arc<dyn Worker>` suitable for sharing across slots.
//!
//! A worker receives **no cancellation signal**: it may run to completion or
//! forever, and the only way the controller stops it is forced termination of
//! its execution unit. Workers holding resources that need cleanup must not
//! rely on being notified first.

use std::sync::Arc;

use async_trait::async_trait;

/// Shared handle to a worker, cheap to clone across slots.
pub type WorkerRef = Arc<dyn Worker>;

/// # A unit of background work.
///
/// [`run`](Worker::run) may suspend indefinitely at cooperative await points
/// (timed sleeps, I/O) or return when done. It is executed to completion or
/// until its execution unit is force-terminated; no stop signal is delivered
/// beforehand.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use workgroup::Worker;
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Worker for Heartbeat {
///     async fn run(&self) {
///         loop {
///             // do work...
///             tokio::time::sleep(std::time::Duration::from_secs(5)).await;
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Executes the task body.
    ///
    /// May never return; the controlling side terminates the unit abruptly
    /// during teardown if it is still running.
    async fn run(&self);
}
