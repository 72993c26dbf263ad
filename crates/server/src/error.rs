use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use plagio::{ConfigLoadError, DetectError, PlagioError};
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Shown to clients when an analysis fails for reasons they cannot fix.
pub const ANALYSIS_FAILED_MESSAGE: &str = "No se pudo completar el análisis";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Analysis error: {0}")]
    Analysis(#[from] PlagioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// Body of every error response: `{"error": {"code", "message"}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    fn detect_error(&self) -> Option<&DetectError> {
        match self {
            ServerError::Analysis(PlagioError::Detect(err)) => Some(err),
            _ => None,
        }
    }

    /// HTTP status and stable machine-readable code.
    fn classify(&self) -> (StatusCode, &'static str) {
        match (self, self.detect_error()) {
            (_, Some(DetectError::InsufficientInput { .. })) => {
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_INPUT")
            }
            (_, Some(DetectError::Cancelled)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "ANALYSIS_CANCELLED")
            }
            (ServerError::BadRequest(_), _) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (ServerError::NotFound, _) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServerError::Analysis(_), _) => (StatusCode::INTERNAL_SERVER_ERROR, "ANALYSIS_FAILED"),
            (ServerError::Config(_), _) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        }
    }

    /// Client-facing text. Server-side failures collapse to
    /// [`ANALYSIS_FAILED_MESSAGE`]; the detail only reaches the logs.
    fn user_message(&self) -> String {
        if let Some(err @ DetectError::InsufficientInput { .. }) = self.detect_error() {
            return err.to_string();
        }
        match self {
            ServerError::BadRequest(_) | ServerError::NotFound => self.to_string(),
            _ => ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.user_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConfigLoadError> for ServerError {
    fn from(err: ConfigLoadError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<JsonRejection> for ServerError {
    fn from(err: JsonRejection) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}
