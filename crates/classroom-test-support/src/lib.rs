//! Shared test mocks and utilities for the classroom registrar.

mod bus;
mod clock;
mod event;
mod eventually;
mod store;

pub use bus::{RecordingHandler, RecordingPublisher};
pub use clock::{FixedClock, fixed_now};
pub use event::{TestEvent, pending_test_event};
pub use eventually::eventually;
pub use store::FailingEventStore;
