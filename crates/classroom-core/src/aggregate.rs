//! Aggregate root abstraction.
//!
//! An aggregate is a replayable state machine. `apply` mutates the minimal
//! state needed to evaluate invariants; behaviours on the concrete aggregate
//! check those invariants and, on success, produce events through
//! [`AggregateRoot::apply_change`].

use tracing::{debug, trace};

use crate::error::UnsupportedEvent;
use crate::event::{Event, EventKind};
use crate::id::{AggregateId, AggregateType};

/// Trait for aggregate roots that reconstitute from event history.
pub trait AggregateRoot: Send + Sync + Sized {
    /// The event family this aggregate produces and consumes.
    type Kind: EventKind;

    /// Stream discriminator for this aggregate type.
    const AGGREGATE_TYPE: AggregateType;

    /// Creates an empty aggregate shell with no history.
    fn new(id: AggregateId) -> Self;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> &AggregateId;

    /// Returns the version of the last committed event applied.
    fn version(&self) -> Option<u64>;

    /// Apply an event to mutate internal state. Never fails, never records.
    fn apply(&mut self, event: &Event<Self::Kind>);

    /// Returns uncommitted events in emission order.
    fn uncommitted_events(&self) -> &[Event<Self::Kind>];

    /// Queues an already applied event as an uncommitted change.
    fn record(&mut self, event: Event<Self::Kind>);

    /// Clears uncommitted events after the store confirmed the append.
    fn mark_changes_as_committed(&mut self);

    /// Applies a freshly produced event and queues it for persistence.
    fn apply_change(&mut self, event: Event<Self::Kind>) {
        self.apply(&event);
        debug!(
            aggregate_type = %Self::AGGREGATE_TYPE,
            aggregate_id = %self.aggregate_id(),
            event_type = %event.metadata.event_type,
            "appending event to uncommitted changes"
        );
        self.record(event);
    }
}

/// Rebuilds an aggregate by folding `apply` over its committed history.
///
/// Nothing is queued as uncommitted.
///
/// # Errors
///
/// Returns [`UnsupportedEvent`] at the first event that does not belong to
/// the aggregate's event family; the replay is aborted.
pub fn load_from_history<A, K, I>(mut aggregate: A, history: I) -> Result<A, UnsupportedEvent>
where
    A: AggregateRoot,
    A::Kind: TryFrom<K, Error = UnsupportedEvent>,
    I: IntoIterator<Item = Event<K>>,
{
    debug!(
        aggregate_type = %A::AGGREGATE_TYPE,
        aggregate_id = %aggregate.aggregate_id(),
        "reloading aggregate state from history"
    );
    for event in history {
        let event = event.try_convert::<A::Kind>()?;
        trace!(event_type = %event.metadata.event_type, version = ?event.version(), "replaying event");
        aggregate.apply(&event);
    }
    Ok(aggregate)
}
