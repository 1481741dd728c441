//! Domain events for training classes and students.
//!
//! Each aggregate owns a closed event family. The store and the bus carry
//! the union [`ClassroomEvent`]; narrowing it back to one family fails with
//! [`UnsupportedEvent`] when the payload belongs to another aggregate.

use chrono::NaiveDate;
use classroom_core::aggregate::AggregateRoot;
use classroom_core::error::UnsupportedEvent;
use classroom_core::event::EventKind;
use classroom_core::id::{AggregateId, AggregateType};
use serde::{Deserialize, Serialize};

use super::student::Student;
use super::training_class::TrainingClass;

/// Event type for `NewClassScheduled`.
pub const NEW_CLASS_SCHEDULED_EVENT_TYPE: &str = "class.new_class_scheduled";
/// Event type for `StudentEnrolled`.
pub const STUDENT_ENROLLED_EVENT_TYPE: &str = "class.student_enrolled";
/// Event type for `StudentUnenrolled`.
pub const STUDENT_UNENROLLED_EVENT_TYPE: &str = "class.student_unenrolled";
/// Event type for `NewStudentRegistered`.
pub const NEW_STUDENT_REGISTERED_EVENT_TYPE: &str = "student.new_student_registered";

/// Emitted when a class is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClassScheduled {
    /// The class identifier.
    pub class_id: AggregateId,
    /// The class title.
    pub title: String,
    /// The day the class takes place.
    pub date: NaiveDate,
    /// Number of seats.
    pub class_size: u32,
}

/// Emitted when a student takes a seat in a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEnrolled {
    /// The class identifier.
    pub class_id: AggregateId,
    /// The enrolled student.
    pub student_id: AggregateId,
}

/// Emitted when a student gives a seat back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUnenrolled {
    /// The class identifier.
    pub class_id: AggregateId,
    /// The unenrolled student.
    pub student_id: AggregateId,
    /// Free-text reason given by the caller.
    pub reason: String,
}

/// Emitted when a student registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudentRegistered {
    /// The student identifier.
    pub student_id: AggregateId,
    /// Contact email, unique across students.
    pub email: String,
    /// Full name.
    pub full_name: String,
}

/// Event payload variants for the `TrainingClass` aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingClassEvent {
    /// A class has been scheduled.
    NewClassScheduled(NewClassScheduled),
    /// A student has been enrolled.
    StudentEnrolled(StudentEnrolled),
    /// A student has been unenrolled.
    StudentUnenrolled(StudentUnenrolled),
}

impl EventKind for TrainingClassEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::NewClassScheduled(_) => NEW_CLASS_SCHEDULED_EVENT_TYPE,
            Self::StudentEnrolled(_) => STUDENT_ENROLLED_EVENT_TYPE,
            Self::StudentUnenrolled(_) => STUDENT_UNENROLLED_EVENT_TYPE,
        }
    }
}

/// Event payload variants for the `Student` aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentEvent {
    /// A student has been registered.
    NewStudentRegistered(NewStudentRegistered),
}

impl EventKind for StudentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::NewStudentRegistered(_) => NEW_STUDENT_REGISTERED_EVENT_TYPE,
        }
    }
}

/// Every event the classroom registrar stores and publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassroomEvent {
    /// An event of a `TrainingClass` stream.
    TrainingClass(TrainingClassEvent),
    /// An event of a `Student` stream.
    Student(StudentEvent),
}

impl EventKind for ClassroomEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::TrainingClass(kind) => kind.event_type(),
            Self::Student(kind) => kind.event_type(),
        }
    }
}

impl From<TrainingClassEvent> for ClassroomEvent {
    fn from(kind: TrainingClassEvent) -> Self {
        Self::TrainingClass(kind)
    }
}

impl From<StudentEvent> for ClassroomEvent {
    fn from(kind: StudentEvent) -> Self {
        Self::Student(kind)
    }
}

fn unsupported(aggregate_type: AggregateType, kind: &ClassroomEvent) -> UnsupportedEvent {
    UnsupportedEvent {
        aggregate_type,
        event_type: kind.event_type(),
    }
}

impl TryFrom<ClassroomEvent> for TrainingClassEvent {
    type Error = UnsupportedEvent;

    fn try_from(kind: ClassroomEvent) -> Result<Self, Self::Error> {
        match kind {
            ClassroomEvent::TrainingClass(kind) => Ok(kind),
            other @ ClassroomEvent::Student(_) => {
                Err(unsupported(TrainingClass::AGGREGATE_TYPE, &other))
            }
        }
    }
}

impl TryFrom<ClassroomEvent> for StudentEvent {
    type Error = UnsupportedEvent;

    fn try_from(kind: ClassroomEvent) -> Result<Self, Self::Error> {
        match kind {
            ClassroomEvent::Student(kind) => Ok(kind),
            other @ ClassroomEvent::TrainingClass(_) => {
                Err(unsupported(Student::AGGREGATE_TYPE, &other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrolled() -> TrainingClassEvent {
        TrainingClassEvent::StudentEnrolled(StudentEnrolled {
            class_id: AggregateId::from("class-1"),
            student_id: AggregateId::from("student-1"),
        })
    }

    #[test]
    fn test_union_keeps_the_event_type_of_the_wrapped_kind() {
        // Arrange
        let kind = ClassroomEvent::from(enrolled());

        // Act
        let event_type = kind.event_type();

        // Assert
        assert_eq!(event_type, STUDENT_ENROLLED_EVENT_TYPE);
    }

    #[test]
    fn test_narrowing_to_the_owning_family_succeeds() {
        // Arrange
        let kind = ClassroomEvent::from(enrolled());

        // Act
        let narrowed = TrainingClassEvent::try_from(kind);

        // Assert
        assert_eq!(narrowed, Ok(enrolled()));
    }

    #[test]
    fn test_narrowing_to_another_family_is_unsupported() {
        // Arrange
        let kind = ClassroomEvent::from(enrolled());

        // Act
        let narrowed = StudentEvent::try_from(kind);

        // Assert
        assert_eq!(
            narrowed,
            Err(UnsupportedEvent {
                aggregate_type: Student::AGGREGATE_TYPE,
                event_type: STUDENT_ENROLLED_EVENT_TYPE,
            })
        );
    }
}
