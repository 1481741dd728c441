//! Test stores: mock `EventStore` implementations for tests.

use async_trait::async_trait;
use classroom_core::error::DomainError;
use classroom_core::event::{Event, EventKind};
use classroom_core::id::{AggregateId, AggregateType};
use classroom_core::store::EventStore;

/// An event store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventStore;

#[async_trait]
impl<K: EventKind> EventStore<K> for FailingEventStore {
    async fn save_events(
        &self,
        _aggregate_type: AggregateType,
        _aggregate_id: &AggregateId,
        _events: Vec<Event<K>>,
        _expected_version: Option<u64>,
    ) -> Result<Vec<Event<K>>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn get_events_for_aggregate(
        &self,
        _aggregate_type: AggregateType,
        _aggregate_id: &AggregateId,
    ) -> Result<Option<Vec<Event<K>>>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
