use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::DbId;

/// Authenticated caller, injected into request extensions by [`require_auth`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub user_lang_code: String,
}

/// Language of the authenticated caller, attached to the response so the
/// envelope is rendered in it.
#[derive(Clone, Debug)]
pub struct CallerLang(pub String);

/// Rejects the request with 401 unless it carries the caller's current access
/// token; otherwise injects [`AuthUser`] for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers()).map_err(|reason| {
        tracing::debug!("Rejecting request: {}", reason);
        ApiError::Unauthorized
    })?;

    let user = state.services.auth.authenticate(&token).await?;
    let lang = user.user_lang_code.clone();
    request.extensions_mut().insert(user);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(CallerLang(lang));
    Ok(response)
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err("Missing Authorization header"));
    }

    #[test]
    fn malformed_headers_are_rejected_without_panicking() {
        assert!(extract_bearer(&headers("Bearer")).is_err());
        assert!(extract_bearer(&headers("Bearer ")).is_err());
        assert!(extract_bearer(&headers("Bearer    ")).is_err());
        assert!(extract_bearer(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_bearer(&headers("abc.def.ghi")).is_err());
        assert!(extract_bearer(&headers("")).is_err());
    }
}
