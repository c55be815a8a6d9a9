use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use super::error_responses::error_response;

pub async fn not_found() -> Response {
    info!("backend router: not_found handler invoked");
    error_response(StatusCode::NOT_FOUND, "NOT_FOUND")
}

pub async fn health_check() -> impl IntoResponse {
    info!("backend router: health_check handler invoked");
    (StatusCode::OK, "OK").into_response()
}
