//! Repository abstraction: load aggregates by replay, save by append.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::aggregate::{AggregateRoot, load_from_history};
use crate::error::{DomainError, UnsupportedEvent};
use crate::event::{Event, EventKind};
use crate::id::AggregateId;
use crate::store::EventStore;

/// Repository for one aggregate type.
#[async_trait]
pub trait Repository<A: AggregateRoot>: Send + Sync {
    /// Reconstructs an aggregate from its stream, or `None` if it has none.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnsupportedEvent` if the stream cannot be
    /// replayed, or a store error.
    async fn get_by_id(&self, id: &AggregateId) -> Result<Option<A>, DomainError>;

    /// Persists the aggregate's uncommitted changes and returns them as
    /// committed events. Changes are marked committed only on success.
    ///
    /// # Errors
    ///
    /// Store failures, including `DomainError::ConcurrentChangeDetected`, are
    /// returned unchanged and the changes stay uncommitted.
    async fn save(
        &self,
        aggregate: &mut A,
        expected_version: Option<u64>,
    ) -> Result<Vec<Event<A::Kind>>, DomainError>;

    /// Creates an empty aggregate shell of this repository's type.
    fn new(&self, id: AggregateId) -> A;
}

/// Repository that rebuilds aggregates from an [`EventStore`].
///
/// `K` is the store-wide event family; the aggregate's own family converts
/// into it for writes and back out of it for replay.
pub struct EventSourcedRepository<A, K: EventKind> {
    store: Arc<dyn EventStore<K>>,
    aggregate: PhantomData<fn() -> A>,
}

impl<A, K: EventKind> EventSourcedRepository<A, K> {
    /// Creates a repository backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore<K>>) -> Self {
        Self {
            store,
            aggregate: PhantomData,
        }
    }
}

impl<A: AggregateRoot, K: EventKind> fmt::Debug for EventSourcedRepository<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSourcedRepository")
            .field("aggregate_type", &A::AGGREGATE_TYPE)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<A, K> Repository<A> for EventSourcedRepository<A, K>
where
    A: AggregateRoot + 'static,
    K: EventKind + From<A::Kind>,
    A::Kind: TryFrom<K, Error = UnsupportedEvent>,
{
    #[instrument(skip(self), fields(aggregate_type = %A::AGGREGATE_TYPE, aggregate_id = %id))]
    async fn get_by_id(&self, id: &AggregateId) -> Result<Option<A>, DomainError> {
        let shell = <Self as Repository<A>>::new(self, id.clone());
        let Some(history) = self
            .store
            .get_events_for_aggregate(A::AGGREGATE_TYPE, id)
            .await?
        else {
            debug!("no stream found");
            return Ok(None);
        };
        debug!(events = history.len(), "replaying stream");
        Ok(Some(load_from_history(shell, history)?))
    }

    #[instrument(
        skip(self, aggregate),
        fields(aggregate_type = %A::AGGREGATE_TYPE, aggregate_id = %aggregate.aggregate_id())
    )]
    async fn save(
        &self,
        aggregate: &mut A,
        expected_version: Option<u64>,
    ) -> Result<Vec<Event<A::Kind>>, DomainError> {
        let pending: Vec<Event<K>> = aggregate
            .uncommitted_events()
            .iter()
            .cloned()
            .map(Event::convert)
            .collect();
        debug!(events = pending.len(), "storing uncommitted events");

        let committed = self
            .store
            .save_events(
                A::AGGREGATE_TYPE,
                aggregate.aggregate_id(),
                pending,
                expected_version,
            )
            .await?;

        aggregate.mark_changes_as_committed();

        committed
            .into_iter()
            .map(|event| event.try_convert::<A::Kind>().map_err(DomainError::from))
            .collect()
    }

    fn new(&self, id: AggregateId) -> A {
        A::new(id)
    }
}
