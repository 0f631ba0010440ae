use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::logic::AuthError;

// Error taxonomy for the API surface. Validation failures block the
// write before it reaches the store; store failures abort the operation
// with no partial mutation (handlers only persist a fully edited copy).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("datastore failure")]
    Store(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::NotConfigured) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::InvalidCode) => StatusCode::FORBIDDEN,
            ApiError::Store(e) => {
                tracing::error!(error = %e, "datastore operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
