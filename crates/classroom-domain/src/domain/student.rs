//! The `Student` aggregate.

use classroom_core::aggregate::AggregateRoot;
use classroom_core::clock::Clock;
use classroom_core::event::Event;
use classroom_core::id::{AggregateId, AggregateType};
use uuid::Uuid;

use super::errors::StudentInvariantViolation;
use super::events::{NewStudentRegistered, StudentEvent};
use super::registered_emails::RegisteredEmailsIndex;

/// A registered student.
///
/// Email uniqueness spans every student, so it is checked against
/// [`RegisteredEmailsIndex`] rather than held here.
#[derive(Debug)]
pub struct Student {
    id: AggregateId,
    version: Option<u64>,
    uncommitted_events: Vec<Event<StudentEvent>>,
}

impl Student {
    /// Registers a new student, producing a `NewStudentRegistered` event.
    ///
    /// # Errors
    ///
    /// Returns `EmailAlreadyInUse` if the index knows the email.
    pub fn register_new(
        email: String,
        full_name: String,
        registered_emails: &RegisteredEmailsIndex,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Self, StudentInvariantViolation> {
        if registered_emails.is_email_already_in_use(&email) {
            return Err(StudentInvariantViolation::EmailAlreadyInUse { email });
        }

        let mut student = <Self as AggregateRoot>::new(AggregateId::generate());
        let kind = StudentEvent::NewStudentRegistered(NewStudentRegistered {
            student_id: student.id.clone(),
            email,
            full_name,
        });
        student.apply_change(Event::new(student.id.clone(), kind, correlation_id, clock.now()));
        Ok(student)
    }
}

impl AggregateRoot for Student {
    type Kind = StudentEvent;

    const AGGREGATE_TYPE: AggregateType = AggregateType::new("student");

    fn new(id: AggregateId) -> Self {
        Self {
            id,
            version: None,
            uncommitted_events: Vec::new(),
        }
    }

    fn aggregate_id(&self) -> &AggregateId {
        &self.id
    }

    fn version(&self) -> Option<u64> {
        self.version
    }

    fn apply(&mut self, event: &Event<Self::Kind>) {
        // Registration carries no invariant state.
        match &event.kind {
            StudentEvent::NewStudentRegistered(_) => {}
        }
        if let Some(version) = event.version() {
            self.version = Some(version);
        }
    }

    fn uncommitted_events(&self) -> &[Event<Self::Kind>] {
        &self.uncommitted_events
    }

    fn record(&mut self, event: Event<Self::Kind>) {
        self.uncommitted_events.push(event);
    }

    fn mark_changes_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }
}
