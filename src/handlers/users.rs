use axum::extract::{Path, State};
use axum::Extension;

use super::extract::{IdParam, OptionalJson, Payload, Upload, UserForm};
use crate::database::models::{DeleteUserRequest, LoginRequest, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /api/v1/users/login
///
/// Messages are rendered in the default language; the caller is anonymous.
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> ApiResult<User> {
    let user = state.services.auth.login(request).await?;
    Ok(ApiResponse::success("success_login", user))
}

/// GET /api/v1/users/refresh-token/:token
pub async fn refresh_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<User> {
    let outcome = state.services.auth.refresh(&token).await?;
    Ok(ApiResponse::success("refresh_token_success", outcome.user).in_lang(outcome.lang_code))
}

/// PUT /api/v1/users/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<()> {
    if !state.services.auth.logout(caller.user_id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(ApiResponse::message("success_logout"))
}

/// GET /api/v1/users
pub async fn find_all(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.services.users.find_all().await?;
    if users.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(ApiResponse::success("success_get_user", users))
}

/// GET /api/v1/users/:id
pub async fn find_by_id(State(state): State<AppState>, IdParam(id): IdParam) -> ApiResult<User> {
    let user = state
        .services
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success("success_get_user", user))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    form: UserForm,
) -> ApiResult<User> {
    let photo = store_photo(&state, form.photo).await?;

    match state
        .services
        .users
        .create(caller.user_id, form.request, photo.clone())
        .await
    {
        Ok(user) => Ok(ApiResponse::success("success_create_user", user)),
        Err(e) => {
            discard_photo(&state, photo).await;
            Err(e.into())
        }
    }
}

/// PUT /api/v1/users/:id
///
/// A new photo replaces the stored one; the old file is removed only after
/// the update has committed.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdParam(id): IdParam,
    form: UserForm,
) -> ApiResult<User> {
    let photo = store_photo(&state, form.photo).await?;

    let outcome = state
        .services
        .users
        .update(caller.user_id, id, form.request, photo.clone())
        .await;

    match outcome {
        Ok(Some(updated)) => {
            discard_photo(&state, updated.replaced_photo).await;
            Ok(ApiResponse::success("success_update_user", updated.user))
        }
        Ok(None) => {
            discard_photo(&state, photo).await;
            Err(ApiError::NotFound)
        }
        Err(e) => {
            discard_photo(&state, photo).await;
            Err(e.into())
        }
    }
}

/// DELETE /api/v1/users/:id
///
/// Body `{"is_soft_delete": true}` keeps the row; anything else removes it
/// together with its photo.
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdParam(id): IdParam,
    OptionalJson(request): OptionalJson<DeleteUserRequest>,
) -> ApiResult<()> {
    let deleted = state
        .services
        .users
        .delete(caller.user_id, id, request.is_soft_delete)
        .await?
        .ok_or(ApiError::NotFound)?;

    discard_photo(&state, deleted.orphaned_photo).await;
    Ok(ApiResponse::message("success_delete_user"))
}

async fn store_photo(state: &AppState, upload: Option<Upload>) -> Result<Option<String>, ApiError> {
    let Some(upload) = upload else {
        return Ok(None);
    };

    state
        .photos
        .save(&upload.file_name, &upload.bytes)
        .await
        .map(Some)
        .map_err(|e| {
            tracing::error!("Photo upload failed: {}", e);
            ApiError::FileUploadFailed
        })
}

async fn discard_photo(state: &AppState, photo: Option<String>) {
    if let Some(name) = photo {
        state.photos.remove(&name).await;
    }
}
