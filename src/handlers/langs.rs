use axum::extract::State;
use axum::Extension;

use super::extract::{IdParam, Payload};
use crate::database::models::{Lang, LangRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn find_all(State(state): State<AppState>) -> ApiResult<Vec<Lang>> {
    let langs = state.services.langs.find_all().await?;
    if langs.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(ApiResponse::success("success_get_language", langs))
}

pub async fn find_by_id(State(state): State<AppState>, IdParam(id): IdParam) -> ApiResult<Lang> {
    let lang = state
        .services
        .langs
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success("success_get_language", lang))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Payload(request): Payload<LangRequest>,
) -> ApiResult<Lang> {
    let lang = state.services.langs.create(caller.user_id, request).await?;
    Ok(ApiResponse::success("success_create_language", lang))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdParam(id): IdParam,
    Payload(request): Payload<LangRequest>,
) -> ApiResult<Lang> {
    let lang = state
        .services
        .langs
        .update(caller.user_id, id, request)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success("success_update_language", lang))
}

pub async fn delete(State(state): State<AppState>, IdParam(id): IdParam) -> ApiResult<()> {
    if !state.services.langs.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(ApiResponse::message("success_delete_language"))
}
