//! Classroom registrar HTTP API.
//!
//! Commands are accepted on `POST` routes and answered with `202 Accepted`:
//! the write is committed, but read models fed by the asynchronous bus may
//! not reflect it yet. Queries read the projections.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full router over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::classes::router())
        .merge(routes::students::router())
        .with_state(state)
}
