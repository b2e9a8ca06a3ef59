use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::auth::password::hash_password;
use crate::config::AppConfig;
use crate::database::models::{NewUser, User, UserChanges, UserRequest};
use crate::database::Database;
use crate::repositories::UserRepository;
use crate::types::DbId;

/// Result of a successful update.
#[derive(Debug)]
pub struct UpdatedUser {
    pub user: User,
    /// Photo that was replaced and should be removed from storage once the
    /// transaction has committed.
    pub replaced_photo: Option<String>,
}

/// Result of a successful delete.
#[derive(Debug)]
pub struct DeletedUser {
    /// Photo to remove from storage. Only set for hard deletes.
    pub orphaned_photo: Option<String>,
}

pub struct UserService {
    db: Database,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(db: Database, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<User>> {
        let mut uow = self.db.begin().await?;
        let result = UserRepository::find_all(uow.conn())
            .await
            .map_err(ServiceError::from);
        uow.finish(result).await
    }

    pub async fn find_by_id(&self, id: DbId) -> ServiceResult<Option<User>> {
        let mut uow = self.db.begin().await?;
        let result = UserRepository::find_by_id(uow.conn(), id)
            .await
            .map_err(ServiceError::from);
        uow.finish(result).await
    }

    /// Create a user with the configured default password.
    pub async fn create(
        &self,
        actor: DbId,
        request: UserRequest,
        photo: Option<String>,
    ) -> ServiceResult<User> {
        request.validate()?;
        let password_hash = hash_password(&self.config.accounts.default_password)?;

        let new_user = NewUser {
            user_name: request.user_name,
            user_email: request.user_email,
            password_hash,
            user_lang_code: request.user_lang_code,
            user_photo: photo,
        };

        let mut uow = self.db.begin().await?;
        let result = async {
            let id = UserRepository::insert(uow.conn(), &new_user, Some(actor), Utc::now()).await?;
            let user = UserRepository::find_by_id(uow.conn(), id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            Ok::<_, ServiceError>(user)
        }
        .await;
        let user = uow.finish(result).await?;

        tracing::info!(user_id = user.user_id, created_by = actor, "Created user");
        Ok(user)
    }

    /// Update profile fields. `photo` replaces the stored photo when present.
    /// Returns `None` when no live user has `id`.
    pub async fn update(
        &self,
        actor: DbId,
        id: DbId,
        request: UserRequest,
        photo: Option<String>,
    ) -> ServiceResult<Option<UpdatedUser>> {
        request.validate()?;

        let changes = UserChanges {
            user_name: request.user_name,
            user_email: request.user_email,
            user_lang_code: request.user_lang_code,
            user_photo: photo,
        };

        let mut uow = self.db.begin().await?;
        let result = async {
            let Some(current) = UserRepository::find_by_id(uow.conn(), id).await? else {
                return Ok::<_, ServiceError>(None);
            };

            UserRepository::update(uow.conn(), id, &changes, actor, Utc::now()).await?;
            let user = UserRepository::find_by_id(uow.conn(), id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;

            let replaced_photo = if changes.user_photo.is_some() {
                current.user_photo.filter(|old| Some(old) != changes.user_photo.as_ref())
            } else {
                None
            };

            Ok(Some(UpdatedUser { user, replaced_photo }))
        }
        .await;

        uow.finish(result).await
    }

    /// Soft delete stamps `deleted_by`/`deleted_at` and keeps the row; hard
    /// delete removes it. Returns `None` when no live user has `id`.
    pub async fn delete(
        &self,
        actor: DbId,
        id: DbId,
        soft: bool,
    ) -> ServiceResult<Option<DeletedUser>> {
        let mut uow = self.db.begin().await?;
        let result = async {
            let Some(current) = UserRepository::find_by_id(uow.conn(), id).await? else {
                return Ok::<_, ServiceError>(None);
            };

            if soft {
                UserRepository::soft_delete(uow.conn(), id, actor, Utc::now()).await?;
                Ok(Some(DeletedUser { orphaned_photo: None }))
            } else {
                UserRepository::hard_delete(uow.conn(), id).await?;
                Ok(Some(DeletedUser {
                    orphaned_photo: current.user_photo,
                }))
            }
        }
        .await;

        let deleted = uow.finish(result).await?;
        if deleted.is_some() {
            tracing::info!(user_id = id, deleted_by = actor, soft, "Deleted user");
        }
        Ok(deleted)
    }
}
