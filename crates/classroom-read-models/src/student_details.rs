//! Details of every registered student.

use std::sync::Arc;

use async_trait::async_trait;
use classroom_core::bus::{EventHandler, HandlerError};
use classroom_core::event::Event;
use classroom_domain::domain::events::{ClassroomEvent, StudentEvent};
use serde::Serialize;
use tracing::debug;

use crate::datastore::DocumentStore;
use crate::training_classes::committed_version;

/// View of one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDetails {
    /// The student identifier.
    pub student_id: String,
    /// Contact email.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Version of the student this view reflects.
    pub version: u64,
}

/// Writes a `StudentDetails` document per registered student.
pub struct StudentDetailsProjection {
    store: Arc<dyn DocumentStore<StudentDetails>>,
}

impl StudentDetailsProjection {
    /// Creates a projection writing into `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore<StudentDetails>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventHandler<ClassroomEvent> for StudentDetailsProjection {
    fn name(&self) -> &'static str {
        "student_details_projection"
    }

    async fn handle(&self, event: &Event<ClassroomEvent>) -> Result<(), HandlerError> {
        if let ClassroomEvent::Student(StudentEvent::NewStudentRegistered(payload)) = &event.kind {
            let details = StudentDetails {
                student_id: payload.student_id.to_string(),
                email: payload.email.clone(),
                full_name: payload.full_name.clone(),
                version: committed_version(event)?,
            };
            debug!(student_id = %details.student_id, "saving student details");
            self.store.save(&details.student_id, details.clone());
        }
        Ok(())
    }
}

/// Read-only facade over student details.
pub struct StudentDetailsReadModel {
    store: Arc<dyn DocumentStore<StudentDetails>>,
}

impl StudentDetailsReadModel {
    /// Creates a read model over the store the projection writes.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore<StudentDetails>>) -> Self {
        Self { store }
    }

    /// Returns the details of one student.
    #[must_use]
    pub fn get_student_by_id(&self, student_id: &str) -> Option<StudentDetails> {
        self.store.get(student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::InMemoryDocumentStore;
    use crate::test_events::{class_scheduled, date, student_registered};

    #[tokio::test]
    async fn test_registered_student_can_be_read_back() {
        // Arrange
        let store: Arc<InMemoryDocumentStore<StudentDetails>> = Arc::new(InMemoryDocumentStore::new());
        let projection = StudentDetailsProjection::new(store.clone());
        let read_model = StudentDetailsReadModel::new(store);

        // Act
        projection
            .handle(&student_registered("s-1", "ada@example.com", "Ada Lovelace"))
            .await
            .unwrap();
        projection.handle(&class_scheduled("c-1", "Rust", date(3, 1), 2)).await.unwrap();

        // Assert
        assert_eq!(
            read_model.get_student_by_id("s-1"),
            Some(StudentDetails {
                student_id: "s-1".to_owned(),
                email: "ada@example.com".to_owned(),
                full_name: "Ada Lovelace".to_owned(),
                version: 0,
            })
        );
        assert_eq!(read_model.get_student_by_id("c-1"), None);
    }
}
