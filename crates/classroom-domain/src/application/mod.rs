//! Command side of the classroom registrar.

pub mod command_handlers;
pub mod dispatcher;
