//! Test bus doubles: recording `EventPublisher` and `EventHandler`.

use std::sync::Arc;

use async_trait::async_trait;
use classroom_core::bus::{EventHandler, EventPublisher, HandlerError, PublishError};
use classroom_core::event::{Event, EventKind};
use parking_lot::Mutex;

/// A publisher that records every published event and never delivers them.
#[derive(Debug)]
pub struct RecordingPublisher<K> {
    published: Mutex<Vec<Event<K>>>,
}

impl<K: EventKind> RecordingPublisher<K> {
    /// Creates an empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all events that were published, in order.
    pub fn published(&self) -> Vec<Event<K>> {
        self.published.lock().clone()
    }
}

impl<K: EventKind> Default for RecordingPublisher<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K: EventKind> EventPublisher<K> for RecordingPublisher<K> {
    fn register(&self, _handler: Arc<dyn EventHandler<K>>) {}

    async fn publish(&self, event: Event<K>) -> Result<(), PublishError> {
        self.published.lock().push(event);
        Ok(())
    }
}

/// A handler that records every event it receives.
#[derive(Debug)]
pub struct RecordingHandler<K> {
    name: &'static str,
    handled: Mutex<Vec<Event<K>>>,
}

impl<K: EventKind> RecordingHandler<K> {
    /// Creates a recording handler with the given log name.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handled: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all handled events, in delivery order.
    pub fn handled(&self) -> Vec<Event<K>> {
        self.handled.lock().clone()
    }
}

#[async_trait]
impl<K: EventKind> EventHandler<K> for RecordingHandler<K> {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(&self, event: &Event<K>) -> Result<(), HandlerError> {
        self.handled.lock().push(event.clone());
        Ok(())
    }
}
