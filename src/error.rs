//! Error types raised while starting a worker group.
//!
//! This module defines two error enums:
//!
//! - [`StartError`] — why `start` could not produce a group.
//! - [`SpawnError`] — why the platform substrate refused one execution unit.
//!
//! Both types provide `as_label` / `as_message` helpers for logging.
//!
//! `join` has no error type on purpose: teardown is infallible from the
//! caller's perspective and reports through
//! [`DrainOutcome`](crate::DrainOutcome) instead.

use thiserror::Error;

/// # Errors produced while acquiring a single execution unit.
///
/// Produced by [`Spawn::spawn`](crate::Spawn::spawn) implementations when the
/// platform cannot create another worker.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SpawnError {
    /// The execution-unit budget is spent; no more workers can be created.
    #[error("execution unit capacity exhausted (limit {limit})")]
    CapacityExhausted {
        /// The configured unit budget.
        limit: usize,
    },

    /// The substrate refused the unit for a substrate-specific reason.
    #[error("execution substrate rejected the unit: {reason}")]
    Rejected {
        /// Substrate-provided description.
        reason: String,
    },
}

impl SpawnError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SpawnError::CapacityExhausted { .. } => "spawn_capacity_exhausted",
            SpawnError::Rejected { .. } => "spawn_rejected",
        }
    }
}

/// # Errors produced by `start`.
///
/// All startup failures surface synchronously through this type; a partially
/// populated group is never returned. After a [`StartError::Spawn`] failure
/// every unit acquired before the failing index has already been terminated.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartError {
    /// The requested group had no slots (`count == 0` or an empty slot list).
    #[error("worker group requires at least one slot")]
    EmptyGroup,

    /// Acquiring or dispatching to execution unit `index` failed.
    #[error("failed to acquire execution unit {index}")]
    Spawn {
        /// Zero-based index of the unit that could not be acquired.
        index: usize,
        /// The substrate failure.
        #[source]
        source: SpawnError,
    },
}

impl StartError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use workgroup::StartError;
    ///
    /// assert_eq!(StartError::EmptyGroup.as_label(), "start_empty_group");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::EmptyGroup => "start_empty_group",
            StartError::Spawn { .. } => "start_spawn_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StartError::EmptyGroup => "group requires at least one slot".to_string(),
            StartError::Spawn { index, source } => {
                format!("unit {index} acquisition failed: {source}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(StartError::EmptyGroup.as_label(), "start_empty_group");

        let err = StartError::Spawn {
            index: 3,
            source: SpawnError::CapacityExhausted { limit: 4 },
        };
        assert_eq!(err.as_label(), "start_spawn_failed");
        assert_eq!(
            SpawnError::Rejected {
                reason: "x".into()
            }
            .as_label(),
            "spawn_rejected"
        );
    }

    #[test]
    fn test_spawn_message_includes_index_and_cause() {
        let err = StartError::Spawn {
            index: 2,
            source: SpawnError::CapacityExhausted { limit: 2 },
        };
        let msg = err.as_message();
        assert!(msg.contains("unit 2"), "message was: {msg}");
        assert!(msg.contains("limit 2"), "message was: {msg}");
    }
}
