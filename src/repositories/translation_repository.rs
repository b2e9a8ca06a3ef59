use sqlx::PgConnection;

use crate::database::models::{TranslationKey, TranslationTextRow};
use crate::types::{DbId, Timestamp};

macro_rules! key_select {
    () => {
        r#"SELECT a.langkey_id, a.langkey_key,
                  a.created_by, b.user_name AS created_by_name, a.created_at,
                  a.updated_by, c.user_name AS updated_by_name, a.updated_at
           FROM lang_key a
           LEFT JOIN "user" b ON b.user_id = a.created_by
           LEFT JOIN "user" c ON c.user_id = a.updated_by"#
    };
}

macro_rules! text_select {
    () => {
        r#"SELECT langkeytext_id, langkeytext_langkey_id, langkeytext_lang_code, langkeytext_lang_text
           FROM lang_key_text"#
    };
}

/// Translation keys (`lang_key`) and their per-language texts (`lang_key_text`).
pub struct TranslationRepository;

impl TranslationRepository {
    pub async fn find_keys(conn: &mut PgConnection) -> Result<Vec<TranslationKey>, sqlx::Error> {
        sqlx::query_as::<_, TranslationKey>(concat!(key_select!(), " ORDER BY a.langkey_id"))
            .fetch_all(conn)
            .await
    }

    pub async fn find_key_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<TranslationKey>, sqlx::Error> {
        sqlx::query_as::<_, TranslationKey>(concat!(key_select!(), " WHERE a.langkey_id = $1"))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn key_exists(conn: &mut PgConnection, key: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM lang_key WHERE langkey_key = $1)")
            .bind(key)
            .fetch_one(conn)
            .await
    }

    pub async fn insert_key(
        conn: &mut PgConnection,
        key: &str,
        actor: Option<DbId>,
        now: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            r#"INSERT INTO lang_key (langkey_key, created_by, created_at)
               VALUES ($1, $2, $3)
               RETURNING langkey_id"#,
        )
        .bind(key)
        .bind(actor)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    pub async fn update_key(
        conn: &mut PgConnection,
        id: DbId,
        key: &str,
        actor: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE lang_key SET langkey_key = $2, updated_by = $3, updated_at = $4
               WHERE langkey_id = $1"#,
        )
        .bind(id)
        .bind(key)
        .bind(actor)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_key(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lang_key WHERE langkey_id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_texts(
        conn: &mut PgConnection,
        key_id: DbId,
    ) -> Result<Vec<TranslationTextRow>, sqlx::Error> {
        sqlx::query_as::<_, TranslationTextRow>(concat!(
            text_select!(),
            " WHERE langkeytext_langkey_id = $1 ORDER BY langkeytext_lang_code"
        ))
        .bind(key_id)
        .fetch_all(conn)
        .await
    }

    /// Texts for many keys in one round trip, grouped by key then language.
    pub async fn find_texts_for_keys(
        conn: &mut PgConnection,
        key_ids: &[DbId],
    ) -> Result<Vec<TranslationTextRow>, sqlx::Error> {
        sqlx::query_as::<_, TranslationTextRow>(concat!(
            text_select!(),
            " WHERE langkeytext_langkey_id = ANY($1)",
            " ORDER BY langkeytext_langkey_id, langkeytext_lang_code"
        ))
        .bind(key_ids)
        .fetch_all(conn)
        .await
    }

    pub async fn insert_text(
        conn: &mut PgConnection,
        key_id: DbId,
        lang_code: &str,
        text: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            r#"INSERT INTO lang_key_text (langkeytext_langkey_id, langkeytext_lang_code, langkeytext_lang_text)
               VALUES ($1, $2, $3)
               RETURNING langkeytext_id"#,
        )
        .bind(key_id)
        .bind(lang_code)
        .bind(text)
        .fetch_one(conn)
        .await
    }

    pub async fn delete_texts(conn: &mut PgConnection, key_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lang_key_text WHERE langkeytext_langkey_id = $1")
            .bind(key_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Localized text for `key` in `lang_code`, if both exist.
    pub async fn lookup(
        conn: &mut PgConnection,
        key: &str,
        lang_code: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"SELECT t.langkeytext_lang_text
               FROM lang_key_text t
               JOIN lang_key k ON k.langkey_id = t.langkeytext_langkey_id
               WHERE k.langkey_key = $1 AND t.langkeytext_lang_code = $2
               LIMIT 1"#,
        )
        .bind(key)
        .bind(lang_code)
        .fetch_optional(conn)
        .await
    }
}
