use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiFailure;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiFailure::new("Internal server error"),
    )
}

pub fn failure(code: StatusCode, body: ApiFailure) -> Response {
    (code, Json(body)).into_response()
}
