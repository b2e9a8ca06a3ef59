use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgConnection;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::database::models::{Translation, TranslationRequest, TranslationTextRow};
use crate::database::Database;
use crate::repositories::TranslationRepository;
use crate::types::DbId;

/// CRUD over translation keys and their texts, plus the message lookup used
/// to localize every response.
pub struct TranslationService {
    db: Database,
}

impl TranslationService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Translation>> {
        let mut uow = self.db.begin().await?;
        let result = async {
            let keys = TranslationRepository::find_keys(uow.conn()).await?;
            let ids: Vec<DbId> = keys.iter().map(|k| k.langkey_id).collect();
            let texts = TranslationRepository::find_texts_for_keys(uow.conn(), &ids).await?;

            let mut by_key: HashMap<DbId, Vec<TranslationTextRow>> = HashMap::new();
            for text in texts {
                by_key.entry(text.langkeytext_langkey_id).or_default().push(text);
            }

            let translations = keys
                .into_iter()
                .map(|key| {
                    let texts = by_key.remove(&key.langkey_id).unwrap_or_default();
                    Translation::assemble(key, texts)
                })
                .collect();
            Ok::<_, ServiceError>(translations)
        }
        .await;
        uow.finish(result).await
    }

    pub async fn find_by_id(&self, id: DbId) -> ServiceResult<Option<Translation>> {
        let mut uow = self.db.begin().await?;
        let result = load(uow.conn(), id).await;
        uow.finish(result).await
    }

    /// Insert a new key with all of its texts.
    ///
    /// The existence pre-check gives a readable `DuplicateKey`; the unique
    /// constraint on `langkey_key` still catches concurrent creates, which
    /// surface as `Conflict`.
    pub async fn create(&self, actor: DbId, request: TranslationRequest) -> ServiceResult<Translation> {
        request.validate()?;

        let mut uow = self.db.begin().await?;
        let result = async {
            if TranslationRepository::key_exists(uow.conn(), &request.translation_key).await? {
                return Err(ServiceError::DuplicateKey(request.translation_key.clone()));
            }

            let id = TranslationRepository::insert_key(
                uow.conn(),
                &request.translation_key,
                Some(actor),
                Utc::now(),
            )
            .await?;
            insert_texts(uow.conn(), id, &request).await?;

            load(uow.conn(), id)
                .await?
                .ok_or_else(|| ServiceError::Database(sqlx::Error::RowNotFound))
        }
        .await;
        uow.finish(result).await
    }

    /// Rename the key and replace all of its texts. Returns `None` when no
    /// key has `id`.
    pub async fn update(
        &self,
        actor: DbId,
        id: DbId,
        request: TranslationRequest,
    ) -> ServiceResult<Option<Translation>> {
        request.validate()?;

        let mut uow = self.db.begin().await?;
        let result = async {
            let updated = TranslationRepository::update_key(
                uow.conn(),
                id,
                &request.translation_key,
                actor,
                Utc::now(),
            )
            .await?;
            if updated == 0 {
                return Ok(None);
            }

            TranslationRepository::delete_texts(uow.conn(), id).await?;
            insert_texts(uow.conn(), id, &request).await?;

            load(uow.conn(), id).await
        }
        .await;
        uow.finish(result).await
    }

    /// Remove the key and its texts. Returns `false` when no key has `id`.
    pub async fn delete(&self, id: DbId) -> ServiceResult<bool> {
        let mut uow = self.db.begin().await?;
        let result = async {
            TranslationRepository::delete_texts(uow.conn(), id).await?;
            let deleted = TranslationRepository::delete_key(uow.conn(), id).await?;
            Ok::<_, ServiceError>(deleted > 0)
        }
        .await;
        uow.finish(result).await
    }

    /// Localized text for `key`, if a row exists for `lang_code`.
    pub async fn lookup(&self, key: &str, lang_code: &str) -> ServiceResult<Option<String>> {
        let mut uow = self.db.begin().await?;
        let result = TranslationRepository::lookup(uow.conn(), key, lang_code)
            .await
            .map_err(ServiceError::from);
        uow.finish(result).await
    }

    /// Message text for responses. Never fails: a missing row or a database
    /// error yields `"[key]"`.
    pub async fn translate(&self, key: &str, lang_code: &str) -> String {
        match self.lookup(key, lang_code).await {
            Ok(Some(text)) => text,
            Ok(None) => fallback_text(key),
            Err(e) => {
                tracing::error!("Translation lookup for '{}' failed: {}", key, e);
                fallback_text(key)
            }
        }
    }
}

pub fn fallback_text(key: &str) -> String {
    format!("[{}]", key)
}

async fn load(conn: &mut PgConnection, id: DbId) -> ServiceResult<Option<Translation>> {
    let Some(key) = TranslationRepository::find_key_by_id(&mut *conn, id).await? else {
        return Ok(None);
    };
    let texts = TranslationRepository::find_texts(conn, id).await?;
    Ok(Some(Translation::assemble(key, texts)))
}

async fn insert_texts(
    conn: &mut PgConnection,
    key_id: DbId,
    request: &TranslationRequest,
) -> Result<(), sqlx::Error> {
    for text in &request.translation_text {
        TranslationRepository::insert_text(&mut *conn, key_id, &text.lang_code, &text.lang_text)
            .await?;
    }
    Ok(())
}
