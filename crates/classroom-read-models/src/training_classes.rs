//! Training class details and the class list.
//!
//! Enrollment events only carry the student id, so the projection also keeps
//! an internal view of every registered student's contact, fed by
//! `NewStudentRegistered`. That view is never exposed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use classroom_core::bus::{EventHandler, HandlerError};
use classroom_core::event::Event;
use classroom_domain::domain::events::{
    ClassroomEvent, NewClassScheduled, NewStudentRegistered, StudentEvent, TrainingClassEvent,
};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::datastore::{DocumentStore, SingleDocumentStore};

const EMAIL_CONTACT: &str = "email";

/// Full view of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingClassDetails {
    /// The class identifier.
    pub class_id: String,
    /// The class title.
    pub title: String,
    /// The day the class takes place.
    pub date: NaiveDate,
    /// Number of seats.
    pub total_size: u32,
    /// Free seats.
    pub available_spots: u32,
    /// Enrolled students with their contact.
    pub students: Vec<EnrolledStudent>,
    /// Version of the class this view reflects.
    pub version: u64,
}

/// A student holding a seat, as shown in class details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrolledStudent {
    /// The student identifier.
    pub student_id: String,
    /// How to reach the student. Only `email` exists.
    pub contact_type: String,
    /// The contact itself.
    pub contact: String,
}

/// Entry of the class list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingClassSummary {
    /// The class identifier.
    pub class_id: String,
    /// The class title.
    pub title: String,
    /// The day the class takes place.
    pub date: NaiveDate,
}

/// Classes ordered by date.
pub type TrainingClassList = Vec<TrainingClassSummary>;

/// Contact of any registered student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentContacts {
    /// The student identifier.
    pub student_id: String,
    /// The student email.
    pub email: String,
}

impl From<&StudentContacts> for EnrolledStudent {
    fn from(contacts: &StudentContacts) -> Self {
        Self {
            student_id: contacts.student_id.clone(),
            contact_type: EMAIL_CONTACT.to_owned(),
            contact: contacts.email.clone(),
        }
    }
}

/// Keeps class details, the class list and student contacts up to date.
pub struct TrainingClassProjection {
    details: Arc<dyn DocumentStore<TrainingClassDetails>>,
    list: Arc<dyn SingleDocumentStore<TrainingClassList>>,
    contacts: Arc<dyn DocumentStore<StudentContacts>>,
    // Serializes read-modify-write updates of the views.
    updates: Mutex<()>,
}

impl TrainingClassProjection {
    /// Creates a projection writing into the given stores.
    #[must_use]
    pub fn new(
        details: Arc<dyn DocumentStore<TrainingClassDetails>>,
        list: Arc<dyn SingleDocumentStore<TrainingClassList>>,
        contacts: Arc<dyn DocumentStore<StudentContacts>>,
    ) -> Self {
        Self {
            details,
            list,
            contacts,
            updates: Mutex::new(()),
        }
    }

    fn class_scheduled(&self, payload: &NewClassScheduled, version: u64) {
        debug!(class_id = %payload.class_id, "adding class to read model");
        let details = TrainingClassDetails {
            class_id: payload.class_id.to_string(),
            title: payload.title.clone(),
            date: payload.date,
            total_size: payload.class_size,
            available_spots: payload.class_size,
            students: Vec::new(),
            version,
        };
        self.details.save(&details.class_id, details.clone());

        let mut list = self.list.get().unwrap_or_default();
        list.push(TrainingClassSummary {
            class_id: details.class_id,
            title: details.title,
            date: details.date,
        });
        list.sort_by_key(|class| class.date);
        self.list.save(list);
    }

    fn student_contacts(&self, student_id: &str) -> Result<StudentContacts, HandlerError> {
        self.contacts.get(student_id).ok_or_else(|| {
            HandlerError::InconsistentReadModel(format!("no contacts for student {student_id}"))
        })
    }

    fn class_details(&self, class_id: &str) -> Result<TrainingClassDetails, HandlerError> {
        self.details.get(class_id).ok_or_else(|| {
            HandlerError::InconsistentReadModel(format!("no details for class {class_id}"))
        })
    }

    fn student_enrolled(&self, class_id: &str, student_id: &str, version: u64) -> Result<(), HandlerError> {
        debug!(class_id, student_id, "adding student to class in read model");
        let student = EnrolledStudent::from(&self.student_contacts(student_id)?);
        let mut details = self.class_details(class_id)?;
        details.available_spots = details.available_spots.saturating_sub(1);
        details.students.push(student);
        details.version = version;
        trace!(?details, "class details updated");
        self.details.save(class_id, details);
        Ok(())
    }

    fn student_unenrolled(&self, class_id: &str, student_id: &str, version: u64) -> Result<(), HandlerError> {
        debug!(class_id, student_id, "removing student from class in read model");
        self.student_contacts(student_id)?;
        let mut details = self.class_details(class_id)?;
        details.available_spots += 1;
        details.students.retain(|student| student.student_id != student_id);
        details.version = version;
        trace!(?details, "class details updated");
        self.details.save(class_id, details);
        Ok(())
    }

    fn student_registered(&self, payload: &NewStudentRegistered) {
        debug!(student_id = %payload.student_id, "adding student contacts to read model");
        let contacts = StudentContacts {
            student_id: payload.student_id.to_string(),
            email: payload.email.clone(),
        };
        self.contacts.save(&contacts.student_id, contacts.clone());
    }
}

#[async_trait]
impl EventHandler<ClassroomEvent> for TrainingClassProjection {
    fn name(&self) -> &'static str {
        "training_class_projection"
    }

    async fn handle(&self, event: &Event<ClassroomEvent>) -> Result<(), HandlerError> {
        let version = committed_version(event)?;
        let _updates = self.updates.lock();
        match &event.kind {
            ClassroomEvent::TrainingClass(TrainingClassEvent::NewClassScheduled(payload)) => {
                self.class_scheduled(payload, version);
            }
            ClassroomEvent::TrainingClass(TrainingClassEvent::StudentEnrolled(payload)) => {
                self.student_enrolled(payload.class_id.as_str(), payload.student_id.as_str(), version)?;
            }
            ClassroomEvent::TrainingClass(TrainingClassEvent::StudentUnenrolled(payload)) => {
                self.student_unenrolled(payload.class_id.as_str(), payload.student_id.as_str(), version)?;
            }
            ClassroomEvent::Student(StudentEvent::NewStudentRegistered(payload)) => {
                self.student_registered(payload);
            }
        }
        Ok(())
    }
}

pub(crate) fn committed_version<K>(event: &Event<K>) -> Result<u64, HandlerError> {
    event.version().ok_or_else(|| {
        HandlerError::InconsistentReadModel(format!(
            "event {} was published before being committed",
            event.metadata.event_id
        ))
    })
}

/// Read-only facade over the class views.
pub struct TrainingClassReadModel {
    details: Arc<dyn DocumentStore<TrainingClassDetails>>,
    list: Arc<dyn SingleDocumentStore<TrainingClassList>>,
}

impl TrainingClassReadModel {
    /// Creates a read model over the stores the projection writes.
    #[must_use]
    pub fn new(
        details: Arc<dyn DocumentStore<TrainingClassDetails>>,
        list: Arc<dyn SingleDocumentStore<TrainingClassList>>,
    ) -> Self {
        Self { details, list }
    }

    /// Returns every class, ordered by date.
    #[must_use]
    pub fn all_classes(&self) -> TrainingClassList {
        self.list.get().unwrap_or_default()
    }

    /// Returns the details of one class.
    #[must_use]
    pub fn get_training_class_details_by_id(&self, class_id: &str) -> Option<TrainingClassDetails> {
        self.details.get(class_id)
    }
}
