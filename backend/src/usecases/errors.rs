use axum::http::StatusCode;
use storefront_core::domain::repositories::data_access_error::DataAccessError;
use thiserror::Error;

/// Failures of the catalogue, home content and account use cases.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Admin access required")]
    Forbidden,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

impl ContentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContentError::NotFound(_) => StatusCode::NOT_FOUND,
            ContentError::Forbidden => StatusCode::FORBIDDEN,
            ContentError::Invalid(_) | ContentError::DataAccess(DataAccessError::InvalidKey(_)) => {
                StatusCode::BAD_REQUEST
            }
            ContentError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_keys_are_client_errors_and_transport_failures_are_not() {
        assert_eq!(
            ContentError::DataAccess(DataAccessError::InvalidKey("a/b".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ContentError::DataAccess(DataAccessError::fetch(
                "movies",
                anyhow::anyhow!("connection reset")
            ))
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ContentError::NotFound("Movie").to_string(), "Movie not found");
    }
}
