//! Synchronous in-memory event bus.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use classroom_core::bus::{EventHandler, EventPublisher, PublishError};
use classroom_core::event::{Event, EventKind};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::deliver;

/// Bus that runs every handler, in registration order, before `publish`
/// returns.
pub struct InMemoryBus<K: EventKind> {
    handlers: RwLock<Vec<Arc<dyn EventHandler<K>>>>,
}

impl<K: EventKind> InMemoryBus<K> {
    /// Creates a bus with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }
}

impl<K: EventKind> Default for InMemoryBus<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventKind> fmt::Debug for InMemoryBus<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryBus")
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}

#[async_trait]
impl<K: EventKind> EventPublisher<K> for InMemoryBus<K> {
    fn register(&self, handler: Arc<dyn EventHandler<K>>) {
        info!(handler = handler.name(), "registering event handler");
        self.handlers.write().push(handler);
    }

    async fn publish(&self, event: Event<K>) -> Result<(), PublishError> {
        debug!(event_type = %event.metadata.event_type, version = ?event.version(), "publishing event");
        // Handlers registered during this publish only see later events.
        let handlers = self.handlers.read().clone();
        for handler in &handlers {
            deliver(handler.as_ref(), &event).await;
        }
        Ok(())
    }
}
