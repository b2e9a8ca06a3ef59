use sqlx::PgConnection;

use crate::database::models::{NewUser, User, UserChanges, UserCredentials, UserSession};
use crate::types::{DbId, Timestamp};

/// Shared projection for the joined user view. `b` and `c` resolve the
/// creator and updater names and may be absent.
macro_rules! user_select {
    () => {
        r#"SELECT a.user_id, a.user_name, a.user_email, a.user_token, a.user_token_refresh,
                  a.user_lang_code, a.user_last_login, a.user_photo,
                  a.created_by, b.user_name AS created_by_name, a.created_at,
                  a.updated_by, c.user_name AS updated_by_name, a.updated_at
           FROM "user" a
           LEFT JOIN "user" b ON b.user_id = a.created_by
           LEFT JOIN "user" c ON c.user_id = a.updated_by"#
    };
}

pub struct UserRepository;

impl UserRepository {
    pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(concat!(
            user_select!(),
            " WHERE a.deleted_at IS NULL ORDER BY a.user_id"
        ))
        .fetch_all(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(concat!(
            user_select!(),
            " WHERE a.user_id = $1 AND a.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Email comparison is case-insensitive, matching the live-email index.
    pub async fn find_credentials_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        sqlx::query_as::<_, UserCredentials>(
            r#"SELECT user_id, user_password FROM "user"
               WHERE lower(user_email) = lower($1) AND deleted_at IS NULL"#,
        )
        .bind(email)
        .fetch_optional(conn)
        .await
    }

    pub async fn find_id_by_refresh_token(
        conn: &mut PgConnection,
        token: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            r#"SELECT user_id FROM "user"
               WHERE user_token_refresh = $1 AND deleted_at IS NULL"#,
        )
        .bind(token)
        .fetch_optional(conn)
        .await
    }

    pub async fn find_session(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            r#"SELECT user_id, user_name, user_email, user_lang_code, user_token FROM "user"
               WHERE user_id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    pub async fn insert(
        conn: &mut PgConnection,
        user: &NewUser,
        actor: Option<DbId>,
        now: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            r#"INSERT INTO "user"
                   (user_name, user_email, user_password, user_lang_code, user_photo, created_by, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING user_id"#,
        )
        .bind(&user.user_name)
        .bind(&user.user_email)
        .bind(&user.password_hash)
        .bind(&user.user_lang_code)
        .bind(&user.user_photo)
        .bind(actor)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    /// Returns the number of rows touched; zero means no live user with `id`.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        changes: &UserChanges,
        actor: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE "user"
               SET user_name = $2, user_email = $3, user_lang_code = $4,
                   user_photo = COALESCE($5, user_photo),
                   updated_by = $6, updated_at = $7
               WHERE user_id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .bind(&changes.user_name)
        .bind(&changes.user_email)
        .bind(&changes.user_lang_code)
        .bind(&changes.user_photo)
        .bind(actor)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_password(
        conn: &mut PgConnection,
        id: DbId,
        password_hash: &str,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE "user" SET user_password = $2, updated_at = $3
               WHERE user_id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Store a freshly issued token pair and the login time.
    pub async fn update_tokens(
        conn: &mut PgConnection,
        id: DbId,
        access_token: &str,
        refresh_token: &str,
        last_login: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE "user"
               SET user_token = $2, user_token_refresh = $3, user_last_login = $4
               WHERE user_id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(last_login)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn clear_tokens(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE "user" SET user_token = NULL, user_token_refresh = NULL
               WHERE user_id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Stamp the deletion and drop any live session.
    pub async fn soft_delete(
        conn: &mut PgConnection,
        id: DbId,
        actor: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE "user"
               SET deleted_by = $2, deleted_at = $3, user_token = NULL, user_token_refresh = NULL
               WHERE user_id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .bind(actor)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn hard_delete(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE user_id = $1 AND deleted_at IS NULL"#)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
