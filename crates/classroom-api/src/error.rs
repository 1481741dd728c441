//! Classroom API errors and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use classroom_core::error::DomainError;
use classroom_domain::application::command_handlers::CommandFailure;
use classroom_domain::domain::errors::{StudentInvariantViolation, TrainingClassInvariantViolation};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `CommandFailure` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub CommandFailure);

impl From<CommandFailure> for ApiError {
    fn from(err: CommandFailure) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(CommandFailure::Domain(err))
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            CommandFailure::Domain(err) => match err {
                DomainError::AggregateNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "aggregate_not_found")
                }
                DomainError::ConcurrentChangeDetected { .. } => {
                    (StatusCode::CONFLICT, "concurrent_change_detected")
                }
                DomainError::UnsupportedEvent(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "unsupported_event")
                }
                DomainError::Infrastructure(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
                }
            },
            CommandFailure::TrainingClass(violation) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                match violation {
                    TrainingClassInvariantViolation::InvalidClassSize { .. } => "invalid_class_size",
                    TrainingClassInvariantViolation::StudentAlreadyEnrolled { .. } => {
                        "student_already_enrolled"
                    }
                    TrainingClassInvariantViolation::ClassHasNoAvailableSpots { .. } => {
                        "class_has_no_available_spots"
                    }
                    TrainingClassInvariantViolation::UnenrollingNotEnrolledStudent { .. } => {
                        "unenrolling_not_enrolled_student"
                    }
                },
            ),
            CommandFailure::Student(StudentInvariantViolation::EmailAlreadyInUse { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "email_already_in_use")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            error!(err = %self.0, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
