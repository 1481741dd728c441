//! Event store abstraction.

use std::fmt;

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::{Event, EventKind};
use crate::id::{AggregateId, AggregateType};

/// Identifies one stream: an aggregate type plus an aggregate identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamKey {
    /// Aggregate type of the stream.
    pub aggregate_type: AggregateType,
    /// Aggregate instance of the stream.
    pub aggregate_id: AggregateId,
}

impl StreamKey {
    /// Creates a stream key.
    #[must_use]
    pub fn new(aggregate_type: AggregateType, aggregate_id: AggregateId) -> Self {
        Self {
            aggregate_type,
            aggregate_id,
        }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.aggregate_type, self.aggregate_id)
    }
}

/// Store of versioned, append-only event streams.
#[async_trait]
pub trait EventStore<K: EventKind>: Send + Sync {
    /// Appends pending events to a stream with optimistic concurrency and
    /// publishes the committed copies.
    ///
    /// `expected_version` is the tail version the caller believes the stream
    /// has; `None` appends without a check. Versions continue from the tail,
    /// starting at 0 for a new stream. Either every event is appended or none.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConcurrentChangeDetected` if the claim does not
    /// match the stream, or `DomainError::Infrastructure` from a backend.
    async fn save_events(
        &self,
        aggregate_type: AggregateType,
        aggregate_id: &AggregateId,
        events: Vec<Event<K>>,
        expected_version: Option<u64>,
    ) -> Result<Vec<Event<K>>, DomainError>;

    /// Loads the committed history of a stream in version order, or `None`
    /// if the stream has never been written.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` from a backend.
    async fn get_events_for_aggregate(
        &self,
        aggregate_type: AggregateType,
        aggregate_id: &AggregateId,
    ) -> Result<Option<Vec<Event<K>>>, DomainError>;
}

/// Compares a caller's expected version with the current stream tail.
///
/// # Errors
///
/// Returns `DomainError::ConcurrentChangeDetected` when a version is expected
/// and it differs from the tail, including when the stream is empty.
pub fn check_expected_version(
    key: &StreamKey,
    expected_version: Option<u64>,
    tail: Option<u64>,
) -> Result<(), DomainError> {
    match expected_version {
        Some(expected) if tail != Some(expected) => Err(DomainError::ConcurrentChangeDetected {
            aggregate_type: key.aggregate_type,
            aggregate_id: key.aggregate_id.clone(),
            expected: Some(expected),
            actual: tail,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> StreamKey {
        StreamKey::new(AggregateType::new("class"), AggregateId::from("c-1"))
    }

    #[test]
    fn test_stream_key_displays_type_and_id() {
        assert_eq!(key().to_string(), "class:c-1");
    }

    #[test]
    fn test_no_expected_version_never_conflicts() {
        assert!(check_expected_version(&key(), None, None).is_ok());
        assert!(check_expected_version(&key(), None, Some(7)).is_ok());
    }

    #[test]
    fn test_matching_expected_version_passes() {
        assert!(check_expected_version(&key(), Some(2), Some(2)).is_ok());
    }

    #[test]
    fn test_mismatched_expected_version_conflicts() {
        let err = check_expected_version(&key(), Some(1), Some(2)).unwrap_err();

        assert_eq!(
            err,
            DomainError::ConcurrentChangeDetected {
                aggregate_type: AggregateType::new("class"),
                aggregate_id: AggregateId::from("c-1"),
                expected: Some(1),
                actual: Some(2),
            }
        );
    }

    #[test]
    fn test_expected_version_on_empty_stream_conflicts() {
        let result = check_expected_version(&key(), Some(0), None);

        assert!(matches!(
            result,
            Err(DomainError::ConcurrentChangeDetected { actual: None, .. })
        ));
    }
}
