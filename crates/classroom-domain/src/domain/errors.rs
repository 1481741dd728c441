//! Invariant violations: expected business outcomes, not faults.

use classroom_core::id::AggregateId;
use thiserror::Error;

/// A `TrainingClass` behaviour refused to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainingClassInvariantViolation {
    /// A class needs at least one seat.
    #[error("invalid class size {size}: a class needs at least one seat")]
    InvalidClassSize {
        /// The requested size.
        size: i32,
    },

    /// The student already holds a seat.
    #[error("student {student_id} is already enrolled in class {class_id}")]
    StudentAlreadyEnrolled {
        /// The class.
        class_id: AggregateId,
        /// The student.
        student_id: AggregateId,
    },

    /// Every seat is taken.
    #[error("class {class_id} has no available spots")]
    ClassHasNoAvailableSpots {
        /// The class.
        class_id: AggregateId,
    },

    /// Only enrolled students can be unenrolled.
    #[error("student {student_id} is not enrolled in class {class_id}")]
    UnenrollingNotEnrolledStudent {
        /// The class.
        class_id: AggregateId,
        /// The student.
        student_id: AggregateId,
    },
}

/// A `Student` behaviour refused to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentInvariantViolation {
    /// Another student registered with this email.
    #[error("email {email} is already in use")]
    EmailAlreadyInUse {
        /// The rejected email.
        email: String,
    },
}
