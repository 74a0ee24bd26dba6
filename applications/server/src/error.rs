/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadence_core::CadenceError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CadenceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::Catalog(ref e) if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
            ServerError::Catalog(CadenceError::InvalidInput(msg)) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Catalog(ref e) => {
                tracing::error!("Catalog error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Catalog error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::types::AlbumId;

    #[test]
    fn test_status_mapping() {
        let not_found = ServerError::from(CadenceError::AlbumNotFound(AlbumId::new("a1")));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid = ServerError::from(CadenceError::invalid_input("title must not be empty"));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let db = ServerError::from(CadenceError::Database("locked".to_string()));
        assert_eq!(
            db.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
