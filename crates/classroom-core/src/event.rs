//! Domain event abstractions.
//!
//! An [`Event`] is either *pending* (no version, only held in an aggregate's
//! uncommitted changes) or *committed* (version assigned by the event store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::AggregateId;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for logging and routing.
    pub event_type: String,
    /// Aggregate/stream this event belongs to.
    pub aggregate_id: AggregateId,
    /// Position within the aggregate stream. `None` until the store commits it.
    pub version: Option<u64>,
    /// Correlation ID of the command that produced this event.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// A closed family of event payloads.
pub trait EventKind: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;
}

/// Domain event envelope: metadata plus an event-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<K> {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: K,
}

impl<K: EventKind> Event<K> {
    /// Creates a pending event for the given aggregate.
    #[must_use]
    pub fn new(
        aggregate_id: AggregateId,
        kind: K,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id,
                version: None,
                correlation_id,
                occurred_at,
            },
            kind,
        }
    }
}

impl<K> Event<K> {
    /// Returns the stream version, if the event has been committed.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.metadata.version
    }

    /// Returns `true` once the store has assigned a version.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.metadata.version.is_some()
    }

    /// Returns the committed copy of this event at `version`.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.metadata.version = Some(version);
        self
    }

    /// Re-wraps the payload into a wider event family.
    #[must_use]
    pub fn convert<T: From<K>>(self) -> Event<T> {
        Event {
            metadata: self.metadata,
            kind: T::from(self.kind),
        }
    }

    /// Re-wraps the payload into a narrower event family.
    ///
    /// # Errors
    ///
    /// Returns the conversion error when the payload does not belong to `T`.
    pub fn try_convert<T: TryFrom<K>>(self) -> Result<Event<T>, T::Error> {
        Ok(Event {
            kind: T::try_from(self.kind)?,
            metadata: self.metadata,
        })
    }
}
