// HTTP API Error Types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use validator::ValidationErrors;

use crate::middleware::response::{DataMessage, Envelope};
use crate::services::ServiceError;

/// HTTP API error. Every variant renders as the standard envelope with a
/// message key; server-side details are logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(ValidationErrors),
    DuplicateKey(String),

    // 401 Unauthorized
    Unauthorized,
    InvalidCredentials,

    // 404 Not Found
    NotFound,

    // 409 Conflict
    Conflict,

    // 500 Internal Server Error
    FileUploadFailed,
    InternalServerError,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateKey(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::FileUploadFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translation key of the status message
    pub fn message_key(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::ValidationError(_) => "bad_request",
            ApiError::DuplicateKey(_) => "bad_request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::InvalidCredentials => "wrong_email_or_password",
            ApiError::NotFound => "data_not_found",
            ApiError::Conflict => "data_already_exist",
            ApiError::FileUploadFailed => "file_upload_failed",
            ApiError::InternalServerError => "internal_server_error",
        }
    }

    /// Client-safe payload for the `data` field
    pub fn data(&self) -> Value {
        match self {
            ApiError::BadRequest(detail) => Value::String(detail.clone()),
            ApiError::ValidationError(errors) => {
                serde_json::to_value(errors).unwrap_or_else(|_| Value::String(errors.to_string()))
            }
            ApiError::DuplicateKey(_) => self
                .data_message()
                .map(|message| Value::String(message.render(&format!("[{}]", message.key))))
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    /// `data` text that is translated along with the status
    pub fn data_message(&self) -> Option<DataMessage> {
        match self {
            ApiError::DuplicateKey(key) => Some(DataMessage {
                key: "key_translation_is_exist",
                detail: key.clone(),
            }),
            _ => None,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::ValidationError(errors),
            ServiceError::DuplicateKey(key) => ApiError::DuplicateKey(key),
            ServiceError::Conflict => ApiError::Conflict,
            ServiceError::InvalidCredentials => ApiError::InvalidCredentials,
            ServiceError::Unauthorized => ApiError::Unauthorized,
            ServiceError::Storage(e) => {
                tracing::error!("File storage error: {}", e);
                ApiError::FileUploadFailed
            }
            ServiceError::Token(e) => {
                tracing::error!("Token error: {}", e);
                ApiError::InternalServerError
            }
            ServiceError::Password(msg) => {
                tracing::error!("Password hashing error: {}", msg);
                ApiError::InternalServerError
            }
            ServiceError::Database(e) => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message_key())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = Envelope::new(self.status_code(), self.message_key(), self.data());
        match self.data_message() {
            Some(message) => envelope.with_data_message(message),
            None => envelope,
        }
        .into_response()
    }
}
