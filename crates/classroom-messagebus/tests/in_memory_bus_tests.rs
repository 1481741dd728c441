//! Integration tests for the synchronous `InMemoryBus`.

use std::sync::Arc;

use async_trait::async_trait;
use classroom_core::bus::{EventHandler, EventPublisher, HandlerError};
use classroom_core::event::Event;
use classroom_messagebus::InMemoryBus;
use classroom_test_support::{RecordingHandler, TestEvent, pending_test_event};

struct FailingHandler;

#[async_trait]
impl EventHandler<TestEvent> for FailingHandler {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn handle(&self, _event: &Event<TestEvent>) -> Result<(), HandlerError> {
        Err(HandlerError::InconsistentReadModel("boom".into()))
    }
}

fn committed(n: u32) -> Event<TestEvent> {
    pending_test_event("aggr012", n).with_version(u64::from(n))
}

#[tokio::test]
async fn test_every_handler_receives_each_event_exactly_once_before_publish_returns() {
    let bus = InMemoryBus::<TestEvent>::new();
    let first = Arc::new(RecordingHandler::<TestEvent>::new("first"));
    let second = Arc::new(RecordingHandler::<TestEvent>::new("second"));
    bus.register(first.clone());
    bus.register(second.clone());

    let event = committed(0);
    bus.publish(event.clone()).await.unwrap();

    assert_eq!(first.handled(), vec![event.clone()]);
    assert_eq!(second.handled(), vec![event]);
}

#[tokio::test]
async fn test_events_are_delivered_in_publication_order() {
    let bus = InMemoryBus::<TestEvent>::new();
    let handler = Arc::new(RecordingHandler::<TestEvent>::new("recording"));
    bus.register(handler.clone());

    let events: Vec<_> = (0..5).map(committed).collect();
    for event in &events {
        bus.publish(event.clone()).await.unwrap();
    }

    assert_eq!(handler.handled(), events);
}

#[tokio::test]
async fn test_failing_handler_does_not_stop_delivery_to_later_handlers() {
    let bus = InMemoryBus::<TestEvent>::new();
    let recording = Arc::new(RecordingHandler::<TestEvent>::new("recording"));
    bus.register(Arc::new(FailingHandler));
    bus.register(recording.clone());

    let result = bus.publish(committed(0)).await;

    assert!(result.is_ok());
    assert_eq!(recording.handled().len(), 1);
}

#[tokio::test]
async fn test_publish_without_handlers_is_a_no_op() {
    let bus: InMemoryBus<TestEvent> = InMemoryBus::default();

    assert!(bus.publish(committed(0)).await.is_ok());
}

#[tokio::test]
async fn test_handler_registered_later_only_sees_later_events() {
    let bus = InMemoryBus::<TestEvent>::new();
    bus.publish(committed(0)).await.unwrap();
    let handler = Arc::new(RecordingHandler::<TestEvent>::new("late"));
    bus.register(handler.clone());

    bus.publish(committed(1)).await.unwrap();

    let handled = handler.handled();
    assert_eq!(handled.len(), 1);
    assert_eq!(handled[0].kind, TestEvent::Happened(1));
}
