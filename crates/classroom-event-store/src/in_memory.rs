//! In-memory implementation of the `EventStore` trait.
//!
//! Streams live in a map from [`StreamKey`] to an append-only vector of
//! committed events. Every stream has its own async mutex: the tail check,
//! the append and the publication of one save all happen under it, so writers
//! to the same stream are serialized and writers to different streams never
//! contend. Publishing under the lock keeps per-stream delivery order equal to
//! commit order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, trace};

use classroom_core::bus::EventPublisher;
use classroom_core::error::DomainError;
use classroom_core::event::{Event, EventKind};
use classroom_core::id::{AggregateId, AggregateType};
use classroom_core::store::{EventStore, StreamKey, check_expected_version};

type Stream<K> = Arc<Mutex<Vec<Event<K>>>>;

/// Event store keeping every stream in process memory.
pub struct InMemoryEventStore<K: EventKind> {
    streams: RwLock<HashMap<StreamKey, Stream<K>>>,
    publisher: Arc<dyn EventPublisher<K>>,
}

impl<K: EventKind> InMemoryEventStore<K> {
    /// Creates an empty store that publishes committed events to `publisher`.
    #[must_use]
    pub fn new(publisher: Arc<dyn EventPublisher<K>>) -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
            publisher,
        }
    }

    fn stream(&self, key: &StreamKey) -> Option<Stream<K>> {
        self.streams.read().get(key).cloned()
    }

    fn stream_or_insert(&self, key: &StreamKey) -> Stream<K> {
        if let Some(stream) = self.stream(key) {
            return stream;
        }
        self.streams.write().entry(key.clone()).or_default().clone()
    }
}

impl<K: EventKind> fmt::Debug for InMemoryEventStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryEventStore")
            .field("streams", &self.streams.read().len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<K: EventKind> EventStore<K> for InMemoryEventStore<K> {
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    async fn save_events(
        &self,
        aggregate_type: AggregateType,
        aggregate_id: &AggregateId,
        events: Vec<Event<K>>,
        expected_version: Option<u64>,
    ) -> Result<Vec<Event<K>>, DomainError> {
        let key = StreamKey::new(aggregate_type, aggregate_id.clone());
        debug!(?expected_version, "saving new events");

        let handle = self.stream_or_insert(&key);
        let mut stream = handle.lock().await;

        let tail = stream.last().and_then(Event::version);
        if let Err(err) = check_expected_version(&key, expected_version, tail) {
            debug!(?tail, "concurrent change detected");
            return Err(err);
        }

        let first_version = tail.map_or(0, |tail| tail + 1);
        let committed: Vec<Event<K>> = events
            .into_iter()
            .zip(first_version..)
            .map(|(event, version)| event.with_version(version))
            .collect();

        stream.extend(committed.iter().cloned());
        debug!(
            tail = ?stream.last().and_then(Event::version),
            "appended events, publishing"
        );

        for event in &committed {
            trace!(event_type = %event.metadata.event_type, version = ?event.version(), "publishing event");
            if let Err(err) = self.publisher.publish(event.clone()).await {
                error!(%err, event_id = %event.metadata.event_id, "committed event was not published");
            }
        }

        Ok(committed)
    }

    #[instrument(skip(self))]
    async fn get_events_for_aggregate(
        &self,
        aggregate_type: AggregateType,
        aggregate_id: &AggregateId,
    ) -> Result<Option<Vec<Event<K>>>, DomainError> {
        debug!("retrieving events");
        let key = StreamKey::new(aggregate_type, aggregate_id.clone());
        let Some(handle) = self.stream(&key) else {
            return Ok(None);
        };
        let stream = handle.lock().await;
        if stream.is_empty() {
            // Only a rejected or empty save touched this key.
            return Ok(None);
        }
        Ok(Some(stream.clone()))
    }
}
