use axum::{
    body::Body,
    extract::{Request, State},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use serde_json::Value;

use super::auth::CallerLang;
use super::response::Envelope;
use crate::state::AppState;

/// Render pending envelopes with a localized status text.
///
/// A pending `data` message is translated into the same language.
/// The language is the envelope's own override, else the authenticated
/// caller's, else the configured default. Responses without an envelope pass
/// through untouched.
pub async fn localize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let Some(mut envelope) = response.extensions_mut().remove::<Envelope>() else {
        return response;
    };

    let lang = envelope
        .lang
        .clone()
        .or_else(|| response.extensions().get::<CallerLang>().map(|l| l.0.clone()))
        .unwrap_or_else(|| state.config.accounts.default_lang.clone());

    let status = state
        .services
        .translations
        .translate(envelope.message_key, &lang)
        .await;

    if let Some(message) = &envelope.data_message {
        let text = state.services.translations.translate(message.key, &lang).await;
        envelope.data = Value::String(message.render(&text));
    }

    let body = match serde_json::to_vec(&envelope.render(&status)) {
        Ok(bytes) => bytes,
        Err(e) => {
            // Keep the placeholder body already in place
            tracing::error!("Failed to render envelope: {}", e);
            return response;
        }
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Response::from_parts(parts, Body::from(body))
}
