//! Classroom Core: shared event-sourcing abstractions.
//!
//! This crate defines the fundamental traits and types that the aggregates,
//! the event store, the message bus and the read models depend on. It contains
//! no infrastructure code.

pub mod aggregate;
pub mod bus;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod id;
pub mod repository;
pub mod store;
