//! Domain error types.

use thiserror::Error;

use crate::id::{AggregateId, AggregateType};

/// A stream contained an event its aggregate type cannot apply.
///
/// This is never expected in correct operation: it means the stream is
/// corrupted or an event was written under the wrong aggregate type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported event {event_type} for aggregate type {aggregate_type}")]
pub struct UnsupportedEvent {
    /// The aggregate type that was replaying.
    pub aggregate_type: AggregateType,
    /// The event type it could not apply.
    pub event_type: &'static str,
}

/// Failures shared by every aggregate, store and repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The command targeted an aggregate that has no stream.
    #[error("aggregate not found: {aggregate_type}:{aggregate_id}")]
    AggregateNotFound {
        /// The aggregate type that was looked up.
        aggregate_type: AggregateType,
        /// The identifier that was looked up.
        aggregate_id: AggregateId,
    },

    /// Optimistic concurrency conflict: the stream moved since it was read.
    #[error(
        "concurrent change detected on {aggregate_type}:{aggregate_id}: expected version {}, found {}",
        describe_version(.expected.as_ref()),
        describe_version(.actual.as_ref())
    )]
    ConcurrentChangeDetected {
        /// The aggregate type of the stream.
        aggregate_type: AggregateType,
        /// The aggregate that had the conflict.
        aggregate_id: AggregateId,
        /// The version claimed by the caller.
        expected: Option<u64>,
        /// The tail version found in the stream (`None` for an empty stream).
        actual: Option<u64>,
    },

    /// Replay hit an event the aggregate does not know. Fatal.
    #[error(transparent)]
    UnsupportedEvent(#[from] UnsupportedEvent),

    /// An infrastructure/persistence error from a store backend.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

fn describe_version(version: Option<&u64>) -> String {
    version.map_or_else(|| "none".to_owned(), u64::to_string)
}
