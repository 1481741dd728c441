//! Shared application state and the composition root.

use std::sync::Arc;

use classroom_core::bus::{EventHandler, EventPublisher};
use classroom_core::clock::Clock;
use classroom_core::repository::EventSourcedRepository;
use classroom_domain::application::dispatcher::CommandDispatcher;
use classroom_domain::domain::events::ClassroomEvent;
use classroom_domain::domain::registered_emails::RegisteredEmailsIndex;
use classroom_domain::domain::student::Student;
use classroom_domain::domain::training_class::TrainingClass;
use classroom_event_store::in_memory::InMemoryEventStore;
use classroom_messagebus::{AsyncBusConfig, AsyncInMemoryBus, InMemoryBus};
use classroom_read_models::datastore::{InMemoryDocumentStore, InMemorySingleDocumentStore};
use classroom_read_models::student_details::{
    StudentDetails, StudentDetailsProjection, StudentDetailsReadModel,
};
use classroom_read_models::student_list::{StudentList, StudentListProjection, StudentListReadModel};
use classroom_read_models::training_classes::{
    StudentContacts, TrainingClassDetails, TrainingClassList, TrainingClassProjection,
    TrainingClassReadModel,
};
use tracing::info;

use crate::config::BusMode;

/// The event bus the store publishes to.
#[derive(Debug, Clone)]
pub enum EventBus {
    /// Inline delivery.
    Sync(Arc<InMemoryBus<ClassroomEvent>>),
    /// Background delivery.
    Async(Arc<AsyncInMemoryBus<ClassroomEvent>>),
}

impl EventBus {
    /// Creates a bus of the given mode.
    #[must_use]
    pub fn new(mode: BusMode, config: AsyncBusConfig) -> Self {
        match mode {
            BusMode::Sync => Self::Sync(Arc::new(InMemoryBus::new())),
            BusMode::Async => Self::Async(Arc::new(AsyncInMemoryBus::new(config))),
        }
    }

    /// Returns the delivery mode.
    #[must_use]
    pub fn mode(&self) -> BusMode {
        match self {
            Self::Sync(_) => BusMode::Sync,
            Self::Async(_) => BusMode::Async,
        }
    }

    /// Returns `true` once an asynchronous bus has been shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Sync(_) => false,
            Self::Async(bus) => bus.is_closed(),
        }
    }

    /// Drains pending deliveries. A no-op for the synchronous bus.
    pub async fn shutdown(&self) {
        if let Self::Async(bus) = self {
            bus.shutdown().await;
        }
    }

    fn publisher(&self) -> Arc<dyn EventPublisher<ClassroomEvent>> {
        match self {
            Self::Sync(bus) => bus.clone(),
            Self::Async(bus) => bus.clone(),
        }
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Command side entry point.
    pub dispatcher: Arc<CommandDispatcher>,
    /// Class details and class list.
    pub classes: Arc<TrainingClassReadModel>,
    /// Student details.
    pub student_details: Arc<StudentDetailsReadModel>,
    /// Student list.
    pub student_list: Arc<StudentListReadModel>,
    /// The bus, kept for health reporting and shutdown.
    pub bus: EventBus,
}

impl AppState {
    /// Wires store, repositories, projections and dispatcher over `bus`.
    ///
    /// Projections are registered before the store exists, so none misses an
    /// event.
    ///
    /// # Panics
    ///
    /// Panics when an asynchronous bus is wired outside a Tokio runtime.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, bus: EventBus) -> Self {
        let publisher = bus.publisher();

        let class_details = Arc::new(InMemoryDocumentStore::<TrainingClassDetails>::new());
        let class_list = Arc::new(InMemorySingleDocumentStore::<TrainingClassList>::new());
        let student_contacts = Arc::new(InMemoryDocumentStore::<StudentContacts>::new());
        let student_details = Arc::new(InMemoryDocumentStore::<StudentDetails>::new());
        let student_list = Arc::new(InMemorySingleDocumentStore::<StudentList>::new());
        let registered_emails = Arc::new(RegisteredEmailsIndex::new());

        let handlers: [Arc<dyn EventHandler<ClassroomEvent>>; 4] = [
            registered_emails.clone(),
            Arc::new(TrainingClassProjection::new(
                class_details.clone(),
                class_list.clone(),
                student_contacts,
            )),
            Arc::new(StudentDetailsProjection::new(student_details.clone())),
            Arc::new(StudentListProjection::new(student_list.clone())),
        ];
        for handler in handlers {
            publisher.register(handler);
        }
        info!(bus = bus.mode().as_str(), "projections registered");

        let store = Arc::new(InMemoryEventStore::new(publisher));
        let dispatcher = CommandDispatcher::new(
            Arc::new(EventSourcedRepository::<TrainingClass, ClassroomEvent>::new(store.clone())),
            Arc::new(EventSourcedRepository::<Student, ClassroomEvent>::new(store)),
            registered_emails,
            clock,
        );

        Self {
            dispatcher: Arc::new(dispatcher),
            classes: Arc::new(TrainingClassReadModel::new(class_details, class_list)),
            student_details: Arc::new(StudentDetailsReadModel::new(student_details)),
            student_list: Arc::new(StudentListReadModel::new(student_list)),
            bus,
        }
    }
}
