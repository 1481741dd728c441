//! Publish/subscribe seam between the event store and projections.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::event::{Event, EventKind};

/// Failure raised by a projection while handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The projection references a record it never received. The read model
    /// is stale or was built from a partial history.
    #[error("inconsistent read model: {0}")]
    InconsistentReadModel(String),
}

/// Failure to hand an event over to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The bus has been shut down and no longer accepts events.
    #[error("event bus is shut down")]
    Closed,
}

/// A subscriber to committed events, typically a projection.
#[async_trait]
pub trait EventHandler<K: EventKind>: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Handles one committed event.
    ///
    /// # Errors
    ///
    /// Returns a `HandlerError` when the event cannot be folded into the
    /// handler's state. The bus logs it and carries on.
    async fn handle(&self, event: &Event<K>) -> Result<(), HandlerError>;
}

/// Delivers committed events to every registered handler.
#[async_trait]
pub trait EventPublisher<K: EventKind>: Send + Sync {
    /// Registers a handler for every event published from now on.
    fn register(&self, handler: Arc<dyn EventHandler<K>>);

    /// Publishes one committed event.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Closed` once the bus has been shut down.
    async fn publish(&self, event: Event<K>) -> Result<(), PublishError>;
}
