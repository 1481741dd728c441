//! Commands accepted by the classroom registrar.

use chrono::{DateTime, NaiveDate, Utc};
use classroom_core::command::Command;
use classroom_core::id::AggregateId;
use uuid::Uuid;

/// Command to schedule a new class.
#[derive(Debug, Clone)]
pub struct ScheduleNewClass {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// When the command was issued.
    pub created_at: DateTime<Utc>,
    /// The class title.
    pub title: String,
    /// The day the class takes place.
    pub date: NaiveDate,
    /// Requested number of seats.
    pub size: i32,
}

/// Command to enroll a student in a class.
#[derive(Debug, Clone)]
pub struct EnrollStudent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// When the command was issued.
    pub created_at: DateTime<Utc>,
    /// The class identifier.
    pub class_id: AggregateId,
    /// The student identifier.
    pub student_id: AggregateId,
    /// Class version the caller based the decision on.
    pub expected_version: Option<u64>,
}

/// Command to unenroll a student from a class.
#[derive(Debug, Clone)]
pub struct UnenrollStudent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// When the command was issued.
    pub created_at: DateTime<Utc>,
    /// The class identifier.
    pub class_id: AggregateId,
    /// The student identifier.
    pub student_id: AggregateId,
    /// Why the student leaves.
    pub reason: String,
    /// Class version the caller based the decision on.
    pub expected_version: Option<u64>,
}

/// Command to register a new student.
#[derive(Debug, Clone)]
pub struct RegisterNewStudent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// When the command was issued.
    pub created_at: DateTime<Utc>,
    /// Contact email.
    pub email: String,
    /// Full name.
    pub full_name: String,
}

/// Every command the dispatcher routes.
#[derive(Debug, Clone)]
pub enum ClassroomCommand {
    /// Schedule a class.
    ScheduleNewClass(ScheduleNewClass),
    /// Enroll a student.
    EnrollStudent(EnrollStudent),
    /// Unenroll a student.
    UnenrollStudent(UnenrollStudent),
    /// Register a student.
    RegisterNewStudent(RegisterNewStudent),
}

macro_rules! impl_command {
    ($command:ty, $name:literal) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

impl_command!(ScheduleNewClass, "class.schedule_new");
impl_command!(EnrollStudent, "class.enroll_student");
impl_command!(UnenrollStudent, "class.unenroll_student");
impl_command!(RegisterNewStudent, "student.register_new");

impl ClassroomCommand {
    fn inner(&self) -> &dyn Command {
        match self {
            Self::ScheduleNewClass(command) => command,
            Self::EnrollStudent(command) => command,
            Self::UnenrollStudent(command) => command,
            Self::RegisterNewStudent(command) => command,
        }
    }
}

impl Command for ClassroomCommand {
    fn command_type(&self) -> &'static str {
        self.inner().command_type()
    }

    fn correlation_id(&self) -> Uuid {
        self.inner().correlation_id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.inner().created_at()
    }
}

impl From<ScheduleNewClass> for ClassroomCommand {
    fn from(command: ScheduleNewClass) -> Self {
        Self::ScheduleNewClass(command)
    }
}

impl From<EnrollStudent> for ClassroomCommand {
    fn from(command: EnrollStudent) -> Self {
        Self::EnrollStudent(command)
    }
}

impl From<UnenrollStudent> for ClassroomCommand {
    fn from(command: UnenrollStudent) -> Self {
        Self::UnenrollStudent(command)
    }
}

impl From<RegisterNewStudent> for ClassroomCommand {
    fn from(command: RegisterNewStudent) -> Self {
        Self::RegisterNewStudent(command)
    }
}
