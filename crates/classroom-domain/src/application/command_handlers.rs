//! Command handlers for classes and students.
//!
//! Each handler loads or creates the aggregate, runs one behaviour and saves
//! the resulting events with a single store append. A failed behaviour or a
//! failed save appends nothing. Nothing is retried here: a concurrency
//! conflict goes back to the caller, who re-reads and decides again.

use classroom_core::aggregate::AggregateRoot;
use classroom_core::clock::Clock;
use classroom_core::error::DomainError;
use classroom_core::event::Event;
use classroom_core::id::AggregateId;
use classroom_core::repository::Repository;
use thiserror::Error;
use tracing::debug;

use crate::domain::commands::{EnrollStudent, RegisterNewStudent, ScheduleNewClass, UnenrollStudent};
use crate::domain::errors::{StudentInvariantViolation, TrainingClassInvariantViolation};
use crate::domain::registered_emails::RegisteredEmailsIndex;
use crate::domain::student::Student;
use crate::domain::training_class::TrainingClass;

/// Why a command was not carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandFailure {
    /// Not found, concurrency conflict, corrupted stream or store failure.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A training class refused the change.
    #[error(transparent)]
    TrainingClass(#[from] TrainingClassInvariantViolation),
    /// A student refused the change.
    #[error(transparent)]
    Student(#[from] StudentInvariantViolation),
}

/// Outcome of `ScheduleNewClass`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleNewClassSuccess {
    /// The new class.
    pub class_id: AggregateId,
    /// Version of the class after the command.
    pub version: u64,
}

/// Outcome of `EnrollStudent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollStudentSuccess {
    /// The class.
    pub class_id: AggregateId,
    /// Version of the class after the command.
    pub version: u64,
}

/// Outcome of `UnenrollStudent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnenrollStudentSuccess {
    /// The class.
    pub class_id: AggregateId,
    /// Version of the class after the command.
    pub version: u64,
}

/// Outcome of `RegisterNewStudent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterNewStudentSuccess {
    /// The new student.
    pub student_id: AggregateId,
    /// Version of the student after the command.
    pub version: u64,
}

fn committed_version<K>(committed: &[Event<K>]) -> Result<u64, DomainError> {
    committed
        .last()
        .and_then(Event::version)
        .ok_or_else(|| DomainError::Infrastructure("store committed no events".into()))
}

async fn load_class(
    repository: &dyn Repository<TrainingClass>,
    class_id: &AggregateId,
) -> Result<TrainingClass, DomainError> {
    repository
        .get_by_id(class_id)
        .await?
        .ok_or_else(|| DomainError::AggregateNotFound {
            aggregate_type: TrainingClass::AGGREGATE_TYPE,
            aggregate_id: class_id.clone(),
        })
}

/// Handles `ScheduleNewClass`: creates the class and saves it without a
/// version check.
///
/// # Errors
///
/// Returns `InvalidClassSize`, or the store failure.
pub async fn handle_schedule_new_class(
    command: &ScheduleNewClass,
    clock: &dyn Clock,
    repository: &dyn Repository<TrainingClass>,
) -> Result<ScheduleNewClassSuccess, CommandFailure> {
    let mut class = TrainingClass::schedule_new(
        command.title.clone(),
        command.date,
        command.size,
        command.correlation_id,
        clock,
    )?;
    let committed = repository.save(&mut class, None).await?;
    debug!(class_id = %class.aggregate_id(), "class scheduled");

    Ok(ScheduleNewClassSuccess {
        class_id: class.aggregate_id().clone(),
        version: committed_version(&committed)?,
    })
}

/// Handles `EnrollStudent`: loads the class, enrolls the student and saves
/// at the command's expected version.
///
/// # Errors
///
/// Returns `AggregateNotFound`, `StudentAlreadyEnrolled`,
/// `ClassHasNoAvailableSpots`, `ConcurrentChangeDetected` or another store
/// failure.
pub async fn handle_enroll_student(
    command: &EnrollStudent,
    clock: &dyn Clock,
    repository: &dyn Repository<TrainingClass>,
) -> Result<EnrollStudentSuccess, CommandFailure> {
    let mut class = load_class(repository, &command.class_id).await?;
    class.enroll_student(command.student_id.clone(), command.correlation_id, clock)?;
    let committed = repository.save(&mut class, command.expected_version).await?;

    Ok(EnrollStudentSuccess {
        class_id: command.class_id.clone(),
        version: committed_version(&committed)?,
    })
}

/// Handles `UnenrollStudent`: loads the class, unenrolls the student and
/// saves at the command's expected version.
///
/// # Errors
///
/// Returns `AggregateNotFound`, `UnenrollingNotEnrolledStudent`,
/// `ConcurrentChangeDetected` or another store failure.
pub async fn handle_unenroll_student(
    command: &UnenrollStudent,
    clock: &dyn Clock,
    repository: &dyn Repository<TrainingClass>,
) -> Result<UnenrollStudentSuccess, CommandFailure> {
    let mut class = load_class(repository, &command.class_id).await?;
    class.unenroll_student(
        command.student_id.clone(),
        command.reason.clone(),
        command.correlation_id,
        clock,
    )?;
    let committed = repository.save(&mut class, command.expected_version).await?;

    Ok(UnenrollStudentSuccess {
        class_id: command.class_id.clone(),
        version: committed_version(&committed)?,
    })
}

/// Handles `RegisterNewStudent`: checks the email index, creates the student
/// and saves it without a version check.
///
/// # Errors
///
/// Returns `EmailAlreadyInUse`, or the store failure.
pub async fn handle_register_new_student(
    command: &RegisterNewStudent,
    clock: &dyn Clock,
    registered_emails: &RegisteredEmailsIndex,
    repository: &dyn Repository<Student>,
) -> Result<RegisterNewStudentSuccess, CommandFailure> {
    let mut student = Student::register_new(
        command.email.clone(),
        command.full_name.clone(),
        registered_emails,
        command.correlation_id,
        clock,
    )?;
    let committed = repository.save(&mut student, None).await?;
    debug!(student_id = %student.aggregate_id(), "student registered");

    Ok(RegisterNewStudentSuccess {
        student_id: student.aggregate_id().clone(),
        version: committed_version(&committed)?,
    })
}
