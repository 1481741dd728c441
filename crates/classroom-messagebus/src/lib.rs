//! In-memory event buses.
//!
//! Both buses implement [`EventPublisher`](classroom_core::bus::EventPublisher).
//! [`InMemoryBus`] delivers inline, before `publish` returns, which makes read
//! models immediately consistent. [`AsyncInMemoryBus`] queues events per
//! handler and delivers them from background tasks, which makes read models
//! eventually consistent.
//!
//! A failing handler never stops delivery to the others: its error is logged
//! and the event counts as delivered.

pub mod async_in_memory;
pub mod in_memory;

pub use async_in_memory::{AsyncBusConfig, AsyncInMemoryBus};
pub use in_memory::InMemoryBus;

use classroom_core::bus::EventHandler;
use classroom_core::event::{Event, EventKind};
use tracing::{error, trace};

async fn deliver<K: EventKind>(handler: &dyn EventHandler<K>, event: &Event<K>) {
    trace!(
        handler = handler.name(),
        event_type = %event.metadata.event_type,
        version = ?event.version(),
        "handling event"
    );
    if let Err(err) = handler.handle(event).await {
        error!(
            handler = handler.name(),
            %err,
            event_id = %event.metadata.event_id,
            event_type = %event.metadata.event_type,
            "event handler failed"
        );
    }
}
