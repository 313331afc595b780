//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::{ClassifierError, IntentError, SessionError};

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyMessage => StatusCode::BAD_REQUEST,
            Self::Intent(IntentError::UnknownIntent { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Intent(IntentError::Classifier(ClassifierError::Timeout { .. })) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::Intent(IntentError::Classifier(ClassifierError::Failed { .. })) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Session(SessionError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Session(SessionError::InvalidId(_)) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }
        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}
