//! HTTP route modules.

pub mod classes;
pub mod health;
pub mod students;

use axum::Json;
use axum::http::{StatusCode, header};
use serde::Serialize;

/// Every command response: `202`, the `Location` of the aggregate, a JSON body.
pub type Accepted<T> = (StatusCode, [(header::HeaderName, String); 1], Json<T>);

pub(crate) fn accepted<T: Serialize>(location: String, body: T) -> Accepted<T> {
    (StatusCode::ACCEPTED, [(header::LOCATION, location)], Json(body))
}
