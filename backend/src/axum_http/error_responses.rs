use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::usecases::{
    checkout::CheckoutError, errors::ContentError, library::LibraryError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message: message.into(),
    });

    (status, body).into_response()
}

/// Server-side failures are logged in full; the client only learns that
/// something went wrong.
fn render(status: StatusCode, err: &(dyn std::error::Error + 'static)) -> Response {
    if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
        error!(error = ?err, "http: request failed");
        return error_response(status, "Internal server error");
    }

    error_response(status, err.to_string())
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        render(self.status_code(), &self)
    }
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        render(self.status_code(), &self)
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        render(self.status_code(), &self)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use storefront_core::domain::repositories::data_access_error::DataAccessError;

    use super::*;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_detail() {
        let err = ContentError::DataAccess(DataAccessError::fetch(
            "movies",
            anyhow::anyhow!("connection refused to 10.0.0.4"),
        ));

        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body(response).await,
            serde_json::json!({ "code": 500, "message": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn rail_messages_reach_the_client() {
        let response = CheckoutError::SubmitFailed("Wallet is locked".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body(response).await,
            serde_json::json!({ "code": 502, "message": "Wallet is locked" })
        );
    }
}
