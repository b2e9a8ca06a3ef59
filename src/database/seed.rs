//! Schema installation and base data for a fresh database.
//!
//! Everything here is idempotent and safe to run against a live database.

use chrono::Utc;
use sqlx::{Executor, PgConnection};

use crate::auth::password::hash_password;
use crate::database::models::{LangRequest, NewUser};
use crate::database::Database;
use crate::repositories::{LangRepository, UserRepository};
use crate::services::{ServiceError, ServiceResult};
use crate::types::DbId;

pub const SCHEMA: &str = include_str!("../../db/schema.sql");

/// English status texts for every message key the API emits.
pub const BASE_MESSAGES: &[(&str, &str)] = &[
    ("bad_request", "Bad Request"),
    ("internal_server_error", "Internal Server Error"),
    ("file_upload_failed", "File upload failed"),
    ("data_not_found", "Data not found"),
    ("data_already_exist", "Data already exists"),
    ("unauthorized", "Unauthorized"),
    ("success_login", "Login successful"),
    ("wrong_email_or_password", "Wrong email or password"),
    ("refresh_token_success", "Token refreshed successfully"),
    ("success_logout", "Logout successful"),
    ("success_create_user", "User created successfully"),
    ("success_update_user", "User updated successfully"),
    ("success_delete_user", "User deleted successfully"),
    ("success_get_user", "User retrieved successfully"),
    ("success_create_language", "Language created successfully"),
    ("success_update_language", "Language updated successfully"),
    ("success_delete_language", "Language deleted successfully"),
    ("success_get_language", "Language retrieved successfully"),
    ("success_create_translation", "Translation created successfully"),
    ("success_update_translation", "Translation updated successfully"),
    ("success_delete_translation", "Translation deleted successfully"),
    ("success_get_translation", "Translation retrieved successfully"),
    ("key_translation_is_exist", "Translation key already exists"),
];

/// Rows added by [`seed_defaults`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub languages_added: u64,
    pub texts_added: u64,
}

/// Create any missing tables and indexes.
pub async fn apply_schema(db: &Database) -> Result<(), sqlx::Error> {
    // No bind parameters, so the whole file runs as one simple query
    db.pool().execute(SCHEMA).await?;
    tracing::info!("Applied database schema");
    Ok(())
}

/// Ensure English exists and has a text for every base message key.
pub async fn seed_defaults(db: &Database) -> ServiceResult<SeedReport> {
    let mut uow = db.begin().await?;
    let result = async {
        let mut report = SeedReport::default();

        if LangRepository::find_by_code(uow.conn(), "en").await?.is_none() {
            let english = LangRequest {
                lang_code: "en".to_string(),
                lang_name: "English".to_string(),
            };
            LangRepository::insert(uow.conn(), &english, None, Utc::now()).await?;
            report.languages_added += 1;
        }

        for (key, text) in BASE_MESSAGES {
            report.texts_added += seed_message(uow.conn(), key, "en", text).await?;
        }

        Ok::<_, ServiceError>(report)
    }
    .await;
    let report = uow.finish(result).await?;

    tracing::info!(
        languages_added = report.languages_added,
        texts_added = report.texts_added,
        "Seeded default data"
    );
    Ok(report)
}

/// Create the administrator, or reset the password of the live user that
/// already owns `email`. Returns the user id.
pub async fn ensure_admin(
    db: &Database,
    email: &str,
    name: &str,
    password: &str,
    lang_code: &str,
) -> ServiceResult<DbId> {
    let password_hash = hash_password(password)?;

    let mut uow = db.begin().await?;
    let result = async {
        let now = Utc::now();

        let existing = UserRepository::find_credentials_by_email(uow.conn(), email).await?;
        let id = match existing {
            Some(existing) => {
                UserRepository::update_password(uow.conn(), existing.user_id, &password_hash, now)
                    .await?;
                tracing::info!(user_id = existing.user_id, "Reset administrator password");
                existing.user_id
            }
            None => {
                let admin = NewUser {
                    user_name: name.to_string(),
                    user_email: email.to_string(),
                    password_hash: password_hash.clone(),
                    user_lang_code: lang_code.to_string(),
                    user_photo: None,
                };
                let id = UserRepository::insert(uow.conn(), &admin, None, now).await?;
                tracing::info!(user_id = id, "Created administrator");
                id
            }
        };
        Ok::<_, ServiceError>(id)
    }
    .await;
    uow.finish(result).await
}

async fn seed_message(
    conn: &mut PgConnection,
    key: &str,
    lang_code: &str,
    text: &str,
) -> Result<u64, sqlx::Error> {
    let key_id = sqlx::query_scalar::<_, DbId>(
        r#"INSERT INTO lang_key (langkey_key, created_at)
           VALUES ($1, now())
           ON CONFLICT (langkey_key) DO UPDATE SET langkey_key = EXCLUDED.langkey_key
           RETURNING langkey_id"#,
    )
    .bind(key)
    .fetch_one(&mut *conn)
    .await?;

    // Existing texts are left alone so operator edits survive a re-run
    let result = sqlx::query(
        r#"INSERT INTO lang_key_text (langkeytext_langkey_id, langkeytext_lang_code, langkeytext_lang_text)
           VALUES ($1, $2, $3)
           ON CONFLICT (langkeytext_langkey_id, langkeytext_lang_code) DO NOTHING"#,
    )
    .bind(key_id)
    .bind(lang_code)
    .bind(text)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn base_messages_are_unique_and_non_empty() {
        let keys: HashSet<_> = BASE_MESSAGES.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.len(), BASE_MESSAGES.len());
        assert!(BASE_MESSAGES.iter().all(|(_, text)| !text.is_empty()));
    }

    #[test]
    fn base_messages_cover_error_keys() {
        use crate::error::ApiError;

        let keys: HashSet<_> = BASE_MESSAGES.iter().map(|(key, _)| *key).collect();
        for err in [
            ApiError::bad_request("x"),
            ApiError::Unauthorized,
            ApiError::InvalidCredentials,
            ApiError::NotFound,
            ApiError::Conflict,
            ApiError::FileUploadFailed,
            ApiError::InternalServerError,
        ] {
            assert!(keys.contains(err.message_key()), "missing {}", err.message_key());
        }
        let message = ApiError::DuplicateKey("x".to_string()).data_message().unwrap();
        assert!(keys.contains(message.key), "missing {}", message.key);
    }

    #[test]
    fn schema_is_idempotent() {
        let creates = SCHEMA.matches("CREATE ").count();
        let guarded = SCHEMA.matches("IF NOT EXISTS").count();
        assert_eq!(creates, guarded);
    }
}
