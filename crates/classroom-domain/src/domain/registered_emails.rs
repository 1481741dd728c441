//! Auxiliary read model answering "is this email already registered?".
//!
//! The index is fed by `NewStudentRegistered` events from the bus, so it is
//! only as fresh as the bus delivery. Two registrations racing with the same
//! email can both pass the check.

use std::collections::HashSet;

use async_trait::async_trait;
use classroom_core::bus::{EventHandler, HandlerError};
use classroom_core::event::Event;
use parking_lot::RwLock;
use tracing::debug;

use super::events::{ClassroomEvent, StudentEvent};

/// Set of emails used by registered students.
#[derive(Debug, Default)]
pub struct RegisteredEmailsIndex {
    emails: RwLock<HashSet<String>>,
}

impl RegisteredEmailsIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a registered student uses `email`.
    pub fn is_email_already_in_use(&self, email: &str) -> bool {
        self.emails.read().contains(email)
    }
}

#[async_trait]
impl EventHandler<ClassroomEvent> for RegisteredEmailsIndex {
    fn name(&self) -> &'static str {
        "registered_emails_index"
    }

    async fn handle(&self, event: &Event<ClassroomEvent>) -> Result<(), HandlerError> {
        if let ClassroomEvent::Student(StudentEvent::NewStudentRegistered(payload)) = &event.kind {
            debug!(email = %payload.email, "adding email to the index");
            self.emails.write().insert(payload.email.clone());
        }
        Ok(())
    }
}
