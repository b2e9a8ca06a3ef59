use chrono::Utc;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::database::models::{Lang, LangRequest};
use crate::database::Database;
use crate::repositories::LangRepository;
use crate::types::DbId;

pub struct LangService {
    db: Database,
}

impl LangService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Lang>> {
        let mut uow = self.db.begin().await?;
        let result = LangRepository::find_all(uow.conn())
            .await
            .map_err(ServiceError::from);
        uow.finish(result).await
    }

    pub async fn find_by_id(&self, id: DbId) -> ServiceResult<Option<Lang>> {
        let mut uow = self.db.begin().await?;
        let result = LangRepository::find_by_id(uow.conn(), id)
            .await
            .map_err(ServiceError::from);
        uow.finish(result).await
    }

    pub async fn create(&self, actor: DbId, request: LangRequest) -> ServiceResult<Lang> {
        request.validate()?;

        let mut uow = self.db.begin().await?;
        let result = async {
            let id = LangRepository::insert(uow.conn(), &request, Some(actor), Utc::now()).await?;
            let lang = LangRepository::find_by_id(uow.conn(), id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            Ok::<_, ServiceError>(lang)
        }
        .await;
        uow.finish(result).await
    }

    /// Returns `None` when no language has `id`.
    pub async fn update(
        &self,
        actor: DbId,
        id: DbId,
        request: LangRequest,
    ) -> ServiceResult<Option<Lang>> {
        request.validate()?;

        let mut uow = self.db.begin().await?;
        let result = async {
            if LangRepository::update(uow.conn(), id, &request, actor, Utc::now()).await? == 0 {
                return Ok::<_, ServiceError>(None);
            }
            Ok(LangRepository::find_by_id(uow.conn(), id).await?)
        }
        .await;
        uow.finish(result).await
    }

    /// Returns `false` when no language has `id`.
    pub async fn delete(&self, id: DbId) -> ServiceResult<bool> {
        let mut uow = self.db.begin().await?;
        let result = LangRepository::delete(uow.conn(), id)
            .await
            .map_err(ServiceError::from);
        Ok(uow.finish(result).await? > 0)
    }
}
