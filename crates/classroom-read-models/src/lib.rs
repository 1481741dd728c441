//! Read side of the classroom registrar.
//!
//! Each projection subscribes to the bus and folds committed events into
//! denormalized documents; the matching read model is the read-only facade
//! the query side uses. Projections assume the stream they receive is
//! consistent: a reference to a record they never saw is reported as
//! `HandlerError::InconsistentReadModel`.

pub mod datastore;
pub mod student_details;
pub mod student_list;
pub mod training_classes;

#[cfg(test)]
mod test_events;
