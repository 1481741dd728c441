//! Command abstractions.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the events it produces.
    fn correlation_id(&self) -> Uuid;

    /// When the command was issued.
    fn created_at(&self) -> DateTime<Utc>;
}
