//! Routes for training classes.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use classroom_core::aggregate::AggregateRoot;
use classroom_core::error::DomainError;
use classroom_core::id::AggregateId;
use classroom_domain::domain::commands::{
    ClassroomCommand, EnrollStudent, ScheduleNewClass, UnenrollStudent,
};
use classroom_domain::domain::training_class::TrainingClass;
use classroom_read_models::training_classes::{TrainingClassDetails, TrainingClassList};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{Accepted, accepted};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /classes/schedule_new.
#[derive(Debug, Deserialize)]
pub struct ScheduleNewClassRequest {
    /// The class title.
    pub title: String,
    /// The day the class takes place, `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Number of seats.
    pub size: i32,
}

/// Request body for POST /classes/{id}/enroll_student.
#[derive(Debug, Deserialize)]
pub struct EnrollStudentRequest {
    /// The student to enroll.
    pub student_id: String,
    /// Class version the client last read.
    pub class_version: u64,
}

/// Request body for POST /classes/{id}/unenroll_student.
#[derive(Debug, Deserialize)]
pub struct UnenrollStudentRequest {
    /// The student to unenroll.
    pub student_id: String,
    /// Why the student leaves.
    pub reason: String,
    /// Class version the client last read.
    pub class_version: u64,
}

/// Response body returned after a class command is accepted.
#[derive(Debug, Serialize)]
pub struct ClassCommandResponse {
    /// The class the command acted on.
    pub class_id: String,
    /// Class version after the command.
    pub version: u64,
}

async fn dispatch(state: &AppState, command: ClassroomCommand) -> Result<Accepted<ClassCommandResponse>, ApiError> {
    let success = state.dispatcher.handle(command).await?;
    let class_id = success.aggregate_id().to_string();
    Ok(accepted(
        format!("/classes/{class_id}"),
        ClassCommandResponse {
            class_id,
            version: success.version(),
        },
    ))
}

/// POST /classes/schedule_new
#[instrument(skip(state, request), fields(title = %request.title))]
async fn schedule_new(
    State(state): State<AppState>,
    Json(request): Json<ScheduleNewClassRequest>,
) -> Result<Accepted<ClassCommandResponse>, ApiError> {
    let command = ScheduleNewClass {
        correlation_id: Uuid::new_v4(),
        created_at: Utc::now(),
        title: request.title,
        date: request.date,
        size: request.size,
    };

    info!(correlation_id = %command.correlation_id, "handling schedule_new command");

    dispatch(&state, command.into()).await
}

/// POST /classes/{id}/enroll_student
#[instrument(skip(state, request), fields(student_id = %request.student_id))]
async fn enroll_student(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(request): Json<EnrollStudentRequest>,
) -> Result<Accepted<ClassCommandResponse>, ApiError> {
    let command = EnrollStudent {
        correlation_id: Uuid::new_v4(),
        created_at: Utc::now(),
        class_id: AggregateId::from(class_id),
        student_id: AggregateId::from(request.student_id),
        expected_version: Some(request.class_version),
    };

    info!(correlation_id = %command.correlation_id, "handling enroll_student command");

    dispatch(&state, command.into()).await
}

/// POST /classes/{id}/unenroll_student
#[instrument(skip(state, request), fields(student_id = %request.student_id))]
async fn unenroll_student(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(request): Json<UnenrollStudentRequest>,
) -> Result<Accepted<ClassCommandResponse>, ApiError> {
    let command = UnenrollStudent {
        correlation_id: Uuid::new_v4(),
        created_at: Utc::now(),
        class_id: AggregateId::from(class_id),
        student_id: AggregateId::from(request.student_id),
        reason: request.reason,
        expected_version: Some(request.class_version),
    };

    info!(correlation_id = %command.correlation_id, "handling unenroll_student command");

    dispatch(&state, command.into()).await
}

/// GET /classes
async fn list_classes(State(state): State<AppState>) -> Json<TrainingClassList> {
    Json(state.classes.all_classes())
}

/// GET /classes/{id}
#[instrument(skip(state))]
async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> Result<Json<TrainingClassDetails>, ApiError> {
    state
        .classes
        .get_training_class_details_by_id(&class_id)
        .map(Json)
        .ok_or_else(|| {
            ApiError::from(DomainError::AggregateNotFound {
                aggregate_type: TrainingClass::AGGREGATE_TYPE,
                aggregate_id: AggregateId::from(class_id),
            })
        })
}

/// Returns the router for training classes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes))
        .route("/classes/schedule_new", post(schedule_new))
        .route("/classes/{id}", get(get_class))
        .route("/classes/{id}/enroll_student", post(enroll_student))
        .route("/classes/{id}/unenroll_student", post(unenroll_student))
}
