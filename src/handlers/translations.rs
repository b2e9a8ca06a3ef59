use axum::extract::State;
use axum::Extension;

use super::extract::{IdParam, Payload};
use crate::database::models::{Translation, TranslationRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn find_all(State(state): State<AppState>) -> ApiResult<Vec<Translation>> {
    let translations = state.services.translations.find_all().await?;
    if translations.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(ApiResponse::success("success_get_translation", translations))
}

pub async fn find_by_id(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> ApiResult<Translation> {
    let translation = state
        .services
        .translations
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success("success_get_translation", translation))
}

/// POST /api/v1/translation
///
/// An existing key is answered with 400 and `data` naming the key.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Payload(request): Payload<TranslationRequest>,
) -> ApiResult<Translation> {
    let translation = state
        .services
        .translations
        .create(caller.user_id, request)
        .await?;
    Ok(ApiResponse::success("success_create_translation", translation))
}

/// PUT /api/v1/translation/:id
///
/// Replaces the full set of texts.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdParam(id): IdParam,
    Payload(request): Payload<TranslationRequest>,
) -> ApiResult<Translation> {
    let translation = state
        .services
        .translations
        .update(caller.user_id, id, request)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success("success_update_translation", translation))
}

pub async fn delete(State(state): State<AppState>, IdParam(id): IdParam) -> ApiResult<()> {
    if !state.services.translations.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(ApiResponse::message("success_delete_translation"))
}
