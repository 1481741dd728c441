//! A minimal event family for store and bus tests.

use chrono::Utc;
use classroom_core::event::{Event, EventKind};
use classroom_core::id::AggregateId;
use uuid::Uuid;

/// Event payload used where the concrete domain does not matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestEvent {
    /// Something numbered happened.
    Happened(u32),
}

impl EventKind for TestEvent {
    fn event_type(&self) -> &'static str {
        "test.happened"
    }
}

/// Builds a pending `TestEvent::Happened(n)` for `aggregate_id`.
#[must_use]
pub fn pending_test_event(aggregate_id: &str, n: u32) -> Event<TestEvent> {
    Event::new(
        AggregateId::from(aggregate_id),
        TestEvent::Happened(n),
        Uuid::new_v4(),
        Utc::now(),
    )
}
