use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

/// A response body that still needs its localized status text.
///
/// Handlers and errors attach this to the response extensions; the
/// [`localize`](super::localize) layer looks the message key up and writes
/// the final `{code, status, data}` body. Until then the body carries
/// `"[key]"` as its status.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub code: StatusCode,
    pub message_key: &'static str,
    pub data: Value,
    /// Overrides the caller's language for this message.
    pub lang: Option<String>,
    /// A `data` string that also needs translating. Replaces `data` once
    /// rendered.
    pub data_message: Option<DataMessage>,
}

/// Localized `data` text: the translation of `key` followed by `(detail)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMessage {
    pub key: &'static str,
    pub detail: String,
}

impl DataMessage {
    pub fn render(&self, text: &str) -> String {
        format!("{} ({})", text, self.detail)
    }
}

impl Envelope {
    pub fn new(code: StatusCode, message_key: &'static str, data: Value) -> Self {
        Self {
            code,
            message_key,
            data,
            lang: None,
            data_message: None,
        }
    }

    /// Localize `data` as `message.key` plus the detail.
    pub fn with_data_message(mut self, message: DataMessage) -> Self {
        self.data = Value::String(message.render(&format!("[{}]", message.key)));
        self.data_message = Some(message);
        self
    }

    pub fn render(&self, status: &str) -> Value {
        json!({
            "code": self.code.as_u16(),
            "status": status,
            "data": self.data,
        })
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let body = self.render(&format!("[{}]", self.message_key));
        let mut response = (self.code, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Successful API response: message key plus payload.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message_key: &'static str,
    pub data: T,
    pub status_code: StatusCode,
    pub lang: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(message_key: &'static str, data: T) -> Self {
        Self {
            message_key,
            data,
            status_code: StatusCode::OK,
            lang: None,
        }
    }

    /// Render the message in `lang` instead of the caller's language.
    pub fn in_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload; `data` is `null`.
    pub fn message(message_key: &'static str) -> Self {
        Self::success(message_key, ())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        // Convert data to JSON Value for consistent envelope format
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::InternalServerError.into_response();
            }
        };

        Envelope {
            code: self.status_code,
            message_key: self.message_key,
            data,
            lang: self.lang,
            data_message: None,
        }
        .into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
