//! Asynchronous in-memory event bus.
//!
//! Every registered handler owns a bounded queue drained by its own consumer
//! task, so each handler sees events in publication order. `publish` waits
//! until the event sits in every queue, filling them in registration order:
//! a full queue pushes back on the publisher instead of dropping events, and
//! holds back handlers registered after the slow one until it frees a slot.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use classroom_core::bus::{EventHandler, EventPublisher, PublishError};
use classroom_core::event::{Event, EventKind};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::deliver;

/// Default number of events buffered per handler.
pub const DEFAULT_CAPACITY: usize = 100;

/// Tuning for [`AsyncInMemoryBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncBusConfig {
    /// Events buffered per handler before `publish` waits. Zero is treated
    /// as one.
    pub capacity: usize,
    /// Delay applied before each delivery, to mimic a distributed broker.
    pub simulated_latency: Option<Duration>,
}

impl Default for AsyncBusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            simulated_latency: None,
        }
    }
}

struct Subscription<K> {
    handler: &'static str,
    sender: mpsc::Sender<Event<K>>,
}

struct BusState<K> {
    closed: bool,
    subscriptions: Vec<Subscription<K>>,
    consumers: Vec<JoinHandle<()>>,
}

/// Bus that delivers events to handlers from background tasks.
pub struct AsyncInMemoryBus<K: EventKind> {
    config: AsyncBusConfig,
    state: Mutex<BusState<K>>,
}

impl<K: EventKind> AsyncInMemoryBus<K> {
    /// Creates a bus with no handlers.
    #[must_use]
    pub fn new(config: AsyncBusConfig) -> Self {
        Self {
            config: AsyncBusConfig {
                capacity: config.capacity.max(1),
                ..config
            },
            state: Mutex::new(BusState {
                closed: false,
                subscriptions: Vec::new(),
                consumers: Vec::new(),
            }),
        }
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Stops accepting events and waits until every handler has drained
    /// its queue. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let consumers = {
            let mut state = self.state.lock();
            state.closed = true;
            state.subscriptions.clear();
            std::mem::take(&mut state.consumers)
        };
        info!(consumers = consumers.len(), "shutting down event bus");
        for consumer in consumers {
            if let Err(err) = consumer.await {
                error!(%err, "event consumer task failed");
            }
        }
    }
}

impl<K: EventKind> Default for AsyncInMemoryBus<K> {
    fn default() -> Self {
        Self::new(AsyncBusConfig::default())
    }
}

impl<K: EventKind> fmt::Debug for AsyncInMemoryBus<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AsyncInMemoryBus")
            .field("config", &self.config)
            .field("closed", &state.closed)
            .field("handlers", &state.subscriptions.len())
            .finish()
    }
}

#[async_trait]
impl<K: EventKind> EventPublisher<K> for AsyncInMemoryBus<K> {
    /// Spawns the consumer task for `handler`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    fn register(&self, handler: Arc<dyn EventHandler<K>>) {
        let mut state = self.state.lock();
        if state.closed {
            warn!(handler = handler.name(), "event bus is shut down, handler ignored");
            return;
        }
        info!(handler = handler.name(), "registering event handler");
        let (sender, receiver) = mpsc::channel(self.config.capacity);
        state.subscriptions.push(Subscription {
            handler: handler.name(),
            sender,
        });
        state.consumers.push(tokio::spawn(consume(
            handler,
            receiver,
            self.config.simulated_latency,
        )));
    }

    async fn publish(&self, event: Event<K>) -> Result<(), PublishError> {
        let senders: Vec<(&'static str, mpsc::Sender<Event<K>>)> = {
            let state = self.state.lock();
            if state.closed {
                return Err(PublishError::Closed);
            }
            state
                .subscriptions
                .iter()
                .map(|subscription| (subscription.handler, subscription.sender.clone()))
                .collect()
        };
        debug!(event_type = %event.metadata.event_type, version = ?event.version(), "publishing event");
        for (handler, sender) in senders {
            if sender.send(event.clone()).await.is_err() {
                error!(handler, event_id = %event.metadata.event_id, "event consumer is gone, event dropped");
            }
        }
        trace!("event published");
        Ok(())
    }
}

async fn consume<K: EventKind>(
    handler: Arc<dyn EventHandler<K>>,
    mut receiver: mpsc::Receiver<Event<K>>,
    simulated_latency: Option<Duration>,
) {
    debug!(handler = handler.name(), "event consumer started");
    while let Some(event) = receiver.recv().await {
        if let Some(latency) = simulated_latency {
            trace!(?latency, "simulating delivery latency");
            tokio::time::sleep(latency).await;
        }
        deliver(handler.as_ref(), &event).await;
    }
    debug!(handler = handler.name(), "event consumer stopped");
}
