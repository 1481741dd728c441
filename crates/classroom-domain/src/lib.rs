//! Classroom registrar domain.
//!
//! Training classes students enroll in and unenroll from, and the students
//! themselves. The `domain` module holds aggregates, events and commands; the
//! `application` module holds the command handlers and the dispatcher.

pub mod application;
pub mod domain;
