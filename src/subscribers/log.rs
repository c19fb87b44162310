//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and the demos.
//!
//! ## Output format
//! ```text
//! [group-starting] workers=4
//! [group-started] workers=4
//! [worker-started] unit=0
//! [worker-finished] unit=0
//! [drain-started] workers=4 live=2
//! [drain-timed-out] live=1
//! [group-terminated] workers=4
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use -
/// implement a custom [`Subscribe`] for structured logging.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::GroupStarting => {
                println!("[group-starting] workers={:?}", e.count);
            }
            EventKind::GroupStarted => {
                println!("[group-started] workers={:?}", e.count);
            }
            EventKind::StartAborted => {
                println!("[start-aborted] unit={:?} reason={:?}", e.index, e.reason);
            }
            EventKind::WorkerStarted => {
                if let Some(index) = e.index {
                    println!("[worker-started] unit={index}");
                }
            }
            EventKind::WorkerFinished => {
                if let Some(index) = e.index {
                    println!("[worker-finished] unit={index}");
                }
            }
            EventKind::DrainStarted => {
                println!("[drain-started] workers={:?} live={:?}", e.count, e.live);
            }
            EventKind::DrainCompleted => {
                println!("[drain-completed]");
            }
            EventKind::DrainTimedOut => {
                println!("[drain-timed-out] live={:?}", e.live);
            }
            EventKind::QuitForced => {
                println!("[quit-forced] live={:?}", e.live);
            }
            EventKind::GroupTerminated => {
                println!("[group-terminated] workers={:?}", e.count);
            }
            EventKind::UntrackedTerminated => {
                println!("[untracked-terminated]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
