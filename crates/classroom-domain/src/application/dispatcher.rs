//! Routes each command to its handler.

use std::fmt;
use std::sync::Arc;

use classroom_core::clock::Clock;
use classroom_core::command::Command;
use classroom_core::id::AggregateId;
use classroom_core::repository::Repository;
use tracing::{info, instrument, warn};

use super::command_handlers::{
    CommandFailure, EnrollStudentSuccess, RegisterNewStudentSuccess, ScheduleNewClassSuccess,
    UnenrollStudentSuccess, handle_enroll_student, handle_register_new_student,
    handle_schedule_new_class, handle_unenroll_student,
};
use crate::domain::commands::ClassroomCommand;
use crate::domain::registered_emails::RegisteredEmailsIndex;
use crate::domain::student::Student;
use crate::domain::training_class::TrainingClass;

/// Outcome of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSuccess {
    /// A class was scheduled.
    ScheduleNewClass(ScheduleNewClassSuccess),
    /// A student was enrolled.
    EnrollStudent(EnrollStudentSuccess),
    /// A student was unenrolled.
    UnenrollStudent(UnenrollStudentSuccess),
    /// A student was registered.
    RegisterNewStudent(RegisterNewStudentSuccess),
}

impl CommandSuccess {
    /// Returns the aggregate the command acted on.
    #[must_use]
    pub fn aggregate_id(&self) -> &AggregateId {
        match self {
            Self::ScheduleNewClass(success) => &success.class_id,
            Self::EnrollStudent(success) => &success.class_id,
            Self::UnenrollStudent(success) => &success.class_id,
            Self::RegisterNewStudent(success) => &success.student_id,
        }
    }

    /// Returns the aggregate version after the command.
    #[must_use]
    pub fn version(&self) -> u64 {
        match self {
            Self::ScheduleNewClass(success) => success.version,
            Self::EnrollStudent(success) => success.version,
            Self::UnenrollStudent(success) => success.version,
            Self::RegisterNewStudent(success) => success.version,
        }
    }
}

/// Single entry point of the command side.
pub struct CommandDispatcher {
    classes: Arc<dyn Repository<TrainingClass>>,
    students: Arc<dyn Repository<Student>>,
    registered_emails: Arc<RegisteredEmailsIndex>,
    clock: Arc<dyn Clock>,
}

impl CommandDispatcher {
    /// Creates a dispatcher over the given repositories.
    #[must_use]
    pub fn new(
        classes: Arc<dyn Repository<TrainingClass>>,
        students: Arc<dyn Repository<Student>>,
        registered_emails: Arc<RegisteredEmailsIndex>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            classes,
            students,
            registered_emails,
            clock,
        }
    }

    /// Runs `command` through its handler.
    ///
    /// # Errors
    ///
    /// Returns the handler's `CommandFailure` unchanged.
    #[instrument(
        skip(self, command),
        fields(command_type = command.command_type(), correlation_id = %command.correlation_id())
    )]
    pub async fn handle(&self, command: ClassroomCommand) -> Result<CommandSuccess, CommandFailure> {
        let clock = self.clock.as_ref();
        let result = match &command {
            ClassroomCommand::ScheduleNewClass(command) => {
                handle_schedule_new_class(command, clock, self.classes.as_ref())
                    .await
                    .map(CommandSuccess::ScheduleNewClass)
            }
            ClassroomCommand::EnrollStudent(command) => {
                handle_enroll_student(command, clock, self.classes.as_ref())
                    .await
                    .map(CommandSuccess::EnrollStudent)
            }
            ClassroomCommand::UnenrollStudent(command) => {
                handle_unenroll_student(command, clock, self.classes.as_ref())
                    .await
                    .map(CommandSuccess::UnenrollStudent)
            }
            ClassroomCommand::RegisterNewStudent(command) => handle_register_new_student(
                command,
                clock,
                &self.registered_emails,
                self.students.as_ref(),
            )
            .await
            .map(CommandSuccess::RegisterNewStudent),
        };

        match &result {
            Ok(success) => info!(
                aggregate_id = %success.aggregate_id(),
                version = success.version(),
                "command succeeded"
            ),
            Err(err) => warn!(%err, "command failed"),
        }
        result
    }
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use classroom_core::bus::EventPublisher;
    use classroom_core::error::DomainError;
    use classroom_core::repository::EventSourcedRepository;
    use classroom_event_store::in_memory::InMemoryEventStore;
    use classroom_messagebus::InMemoryBus;
    use classroom_test_support::{FixedClock, fixed_now};
    use uuid::Uuid;

    use super::*;
    use crate::domain::commands::{
        EnrollStudent, RegisterNewStudent, ScheduleNewClass, UnenrollStudent,
    };
    use crate::domain::errors::StudentInvariantViolation;
    use crate::domain::events::ClassroomEvent;

    fn dispatcher() -> CommandDispatcher {
        let bus = Arc::new(InMemoryBus::<ClassroomEvent>::new());
        let registered_emails = Arc::new(RegisteredEmailsIndex::new());
        bus.register(registered_emails.clone());
        let store = Arc::new(InMemoryEventStore::new(bus));
        CommandDispatcher::new(
            Arc::new(EventSourcedRepository::<TrainingClass, ClassroomEvent>::new(store.clone())),
            Arc::new(EventSourcedRepository::<Student, ClassroomEvent>::new(store)),
            registered_emails,
            Arc::new(FixedClock::default()),
        )
    }

    fn register(email: &str) -> ClassroomCommand {
        ClassroomCommand::from(RegisterNewStudent {
            correlation_id: Uuid::new_v4(),
            created_at: fixed_now(),
            email: email.to_owned(),
            full_name: "Ada Lovelace".to_owned(),
        })
    }

    #[tokio::test]
    async fn test_dispatches_a_class_journey() {
        // Arrange
        let dispatcher = dispatcher();
        let scheduled = dispatcher
            .handle(ClassroomCommand::from(ScheduleNewClass {
                correlation_id: Uuid::new_v4(),
                created_at: fixed_now(),
                title: "Rust for Rustaceans".to_owned(),
                date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
                size: 1,
            }))
            .await
            .unwrap();
        let class_id = scheduled.aggregate_id().clone();

        // Act
        let enrolled = dispatcher
            .handle(ClassroomCommand::from(EnrollStudent {
                correlation_id: Uuid::new_v4(),
                created_at: fixed_now(),
                class_id: class_id.clone(),
                student_id: AggregateId::from("student-1"),
                expected_version: Some(scheduled.version()),
            }))
            .await
            .unwrap();
        let unenrolled = dispatcher
            .handle(ClassroomCommand::from(UnenrollStudent {
                correlation_id: Uuid::new_v4(),
                created_at: fixed_now(),
                class_id: class_id.clone(),
                student_id: AggregateId::from("student-1"),
                reason: "schedule clash".to_owned(),
                expected_version: Some(enrolled.version()),
            }))
            .await
            .unwrap();

        // Assert
        assert_eq!(scheduled.version(), 0);
        assert!(matches!(enrolled, CommandSuccess::EnrollStudent(_)));
        assert_eq!(enrolled.version(), 1);
        assert_eq!(unenrolled.aggregate_id(), &class_id);
        assert_eq!(unenrolled.version(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_once_the_index_caught_up() {
        // Arrange
        let dispatcher = dispatcher();
        let first = dispatcher.handle(register("ada@example.com")).await.unwrap();

        // Act
        let second = dispatcher.handle(register("ada@example.com")).await;

        // Assert
        assert!(matches!(first, CommandSuccess::RegisterNewStudent(_)));
        assert_eq!(
            second.unwrap_err(),
            CommandFailure::Student(StudentInvariantViolation::EmailAlreadyInUse {
                email: "ada@example.com".to_owned(),
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_class_is_reported_as_not_found() {
        // Arrange
        let dispatcher = dispatcher();

        // Act
        let result = dispatcher
            .handle(ClassroomCommand::from(EnrollStudent {
                correlation_id: Uuid::new_v4(),
                created_at: fixed_now(),
                class_id: AggregateId::from("missing"),
                student_id: AggregateId::from("student-1"),
                expected_version: Some(0),
            }))
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(CommandFailure::Domain(DomainError::AggregateNotFound { .. }))
        ));
    }
}
