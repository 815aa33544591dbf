use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe; returns 200 as long as the process is serving requests.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
