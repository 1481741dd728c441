//! Event store implementations.

pub mod in_memory;
