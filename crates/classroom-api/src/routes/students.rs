//! Routes for students.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use classroom_core::aggregate::AggregateRoot;
use classroom_core::error::DomainError;
use classroom_core::id::AggregateId;
use classroom_domain::domain::commands::RegisterNewStudent;
use classroom_domain::domain::student::Student;
use classroom_read_models::student_details::StudentDetails;
use classroom_read_models::student_list::StudentList;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{Accepted, accepted};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /students/register.
#[derive(Debug, Deserialize)]
pub struct RegisterStudentRequest {
    /// Contact email, unique across students.
    pub email: String,
    /// Full name.
    pub full_name: String,
}

/// Response body returned after a student command is accepted.
#[derive(Debug, Serialize)]
pub struct StudentCommandResponse {
    /// The student the command acted on.
    pub student_id: String,
    /// Student version after the command.
    pub version: u64,
}

/// POST /students/register
#[instrument(skip(state, request))]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterStudentRequest>,
) -> Result<Accepted<StudentCommandResponse>, ApiError> {
    let command = RegisterNewStudent {
        correlation_id: Uuid::new_v4(),
        created_at: Utc::now(),
        email: request.email,
        full_name: request.full_name,
    };

    info!(correlation_id = %command.correlation_id, "handling register_new_student command");

    let success = state.dispatcher.handle(command.into()).await?;
    let student_id = success.aggregate_id().to_string();
    Ok(accepted(
        format!("/students/{student_id}"),
        StudentCommandResponse {
            student_id,
            version: success.version(),
        },
    ))
}

/// GET /students
async fn list_students(State(state): State<AppState>) -> Json<StudentList> {
    Json(state.student_list.all_students())
}

/// GET /students/{id}
#[instrument(skip(state))]
async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentDetails>, ApiError> {
    state
        .student_details
        .get_student_by_id(&student_id)
        .map(Json)
        .ok_or_else(|| {
            ApiError::from(DomainError::AggregateNotFound {
                aggregate_type: Student::AGGREGATE_TYPE,
                aggregate_id: AggregateId::from(student_id),
            })
        })
}

/// Returns the router for students.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students/register", post(register))
        .route("/students/{id}", get(get_student))
}
