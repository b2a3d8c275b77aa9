use axum::{response::IntoResponse, routing, Json, Router};
use serde::Serialize;

pub fn router() -> Router<()> {
    Router::new().route("/api/test", routing::get(test))
}

#[derive(Serialize)]
struct TestResponse {
    message: &'static str,
}

/// Answers as long as the process is listening, even in degraded mode.
async fn test() -> impl IntoResponse {
    Json(TestResponse {
        message: "Backend server is running!",
    })
}
