//! Runtime events and the broadcast bus that carries them.
//!
//! - [`bus`]: non-blocking broadcast channel wrapper;
//! - [`event`]: group lifecycle event types.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
