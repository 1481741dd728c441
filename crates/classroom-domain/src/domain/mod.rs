//! Aggregates, events, commands and invariant violations.

pub mod commands;
pub mod errors;
pub mod events;
pub mod registered_emails;
pub mod student;
pub mod training_class;
