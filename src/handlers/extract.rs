//! Request extractors whose rejections render as the standard envelope.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::database::models::UserRequest;
use crate::error::ApiError;
use crate::types::DbId;

/// Numeric id from the single path parameter.
#[derive(Debug, Clone, Copy)]
pub struct IdParam(pub DbId);

#[async_trait]
impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<DbId>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(IdParam(id))
    }
}

/// Body accepted as JSON or as an urlencoded form.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if content_type_is(&req, "application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(Payload(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(Payload(value))
    }
}

/// JSON body that may be omitted entirely; an empty body yields `T::default()`.
#[derive(Debug)]
pub struct OptionalJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(OptionalJson)
            .map_err(|e| ApiError::bad_request(e.to_string()))
    }
}

/// An uploaded file held in memory until it is stored.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Create/update body for users: JSON, urlencoded form, or multipart with an
/// optional `user_photo` file part.
#[derive(Debug)]
pub struct UserForm {
    pub request: UserRequest,
    pub photo: Option<Upload>,
}

#[async_trait]
impl<S> FromRequest<S> for UserForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !content_type_is(&req, "multipart/form-data") {
            let Payload(request) = Payload::<UserRequest>::from_request(req, state).await?;
            return Ok(UserForm { request, photo: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let mut request = UserRequest::default();
        let mut photo = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "user_photo" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    // Browsers send an empty part when no file was chosen
                    if !bytes.is_empty() {
                        photo = Some(Upload { file_name, bytes });
                    }
                }
                "user_name" | "user_email" | "user_lang_code" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    match name.as_str() {
                        "user_name" => request.user_name = text,
                        "user_email" => request.user_email = text,
                        _ => request.user_lang_code = text,
                    }
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(UserForm { request, photo })
    }
}

fn content_type_is(req: &Request, expected: &str) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.trim_start().starts_with(expected))
}
