//! API error types with JSON responses.

use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    domain::ValueObjectError,
    usecase::{ConnectError, GetBookError, GetChatHistoryError, SendMessageError, UploadBookError},
};

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("{0}")]
    BadRequest(String),

    /// Unauthorized (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Conflict (409).
    #[error("{0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::BadRequest(format!("invalid form data: {}", e.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid JSON body: {}", e.body_text()))
    }
}

impl From<ConnectError> for ApiError {
    fn from(e: ConnectError) -> Self {
        match e {
            ConnectError::DuplicateConnection { .. } => Self::Conflict(e.to_string()),
        }
    }
}

impl From<SendMessageError> for ApiError {
    fn from(e: SendMessageError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<GetChatHistoryError> for ApiError {
    fn from(e: GetChatHistoryError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<UploadBookError> for ApiError {
    fn from(e: UploadBookError) -> Self {
        match e {
            UploadBookError::MissingField(_) => Self::BadRequest(e.to_string()),
            UploadBookError::Upload(_) | UploadBookError::Repository(_) => {
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<GetBookError> for ApiError {
    fn from(e: GetBookError) -> Self {
        match e {
            GetBookError::NotFound(_) => Self::NotFound(e.to_string()),
            GetBookError::Repository(_) => Self::Internal(e.to_string()),
        }
    }
}
