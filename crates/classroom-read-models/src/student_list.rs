//! Alphabetical list of students.

use std::sync::Arc;

use async_trait::async_trait;
use classroom_core::bus::{EventHandler, HandlerError};
use classroom_core::event::Event;
use classroom_domain::domain::events::{ClassroomEvent, StudentEvent};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::datastore::SingleDocumentStore;

/// Entry of the student list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    /// The student identifier.
    pub student_id: String,
    /// Full name.
    pub full_name: String,
}

/// Students ordered by full name.
pub type StudentList = Vec<StudentSummary>;

/// Keeps the student list sorted as students register.
pub struct StudentListProjection {
    store: Arc<dyn SingleDocumentStore<StudentList>>,
    updates: Mutex<()>,
}

impl StudentListProjection {
    /// Creates a projection writing into `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SingleDocumentStore<StudentList>>) -> Self {
        Self {
            store,
            updates: Mutex::new(()),
        }
    }
}

#[async_trait]
impl EventHandler<ClassroomEvent> for StudentListProjection {
    fn name(&self) -> &'static str {
        "student_list_projection"
    }

    async fn handle(&self, event: &Event<ClassroomEvent>) -> Result<(), HandlerError> {
        if let ClassroomEvent::Student(StudentEvent::NewStudentRegistered(payload)) = &event.kind {
            debug!(student_id = %payload.student_id, "adding student to the list");
            let _updates = self.updates.lock();
            let mut list = self.store.get().unwrap_or_default();
            list.push(StudentSummary {
                student_id: payload.student_id.to_string(),
                full_name: payload.full_name.clone(),
            });
            list.sort_by(|a, b| a.full_name.cmp(&b.full_name));
            self.store.save(list);
        }
        Ok(())
    }
}

/// Read-only facade over the student list.
pub struct StudentListReadModel {
    store: Arc<dyn SingleDocumentStore<StudentList>>,
}

impl StudentListReadModel {
    /// Creates a read model over the store the projection writes.
    #[must_use]
    pub fn new(store: Arc<dyn SingleDocumentStore<StudentList>>) -> Self {
        Self { store }
    }

    /// Returns every student, ordered by full name.
    #[must_use]
    pub fn all_students(&self) -> StudentList {
        self.store.get().unwrap_or_default()
    }
}
