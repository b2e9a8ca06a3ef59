use sqlx::PgConnection;

use crate::database::models::{Lang, LangRequest};
use crate::types::{DbId, Timestamp};

macro_rules! lang_select {
    () => {
        r#"SELECT a.lang_id, a.lang_code, a.lang_name,
                  a.created_by, b.user_name AS created_by_name, a.created_at,
                  a.updated_by, c.user_name AS updated_by_name, a.updated_at
           FROM lang a
           LEFT JOIN "user" b ON b.user_id = a.created_by
           LEFT JOIN "user" c ON c.user_id = a.updated_by"#
    };
}

pub struct LangRepository;

impl LangRepository {
    pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Lang>, sqlx::Error> {
        sqlx::query_as::<_, Lang>(concat!(lang_select!(), " ORDER BY a.lang_id"))
            .fetch_all(conn)
            .await
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Lang>, sqlx::Error> {
        sqlx::query_as::<_, Lang>(concat!(lang_select!(), " WHERE a.lang_id = $1"))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_code(
        conn: &mut PgConnection,
        code: &str,
    ) -> Result<Option<Lang>, sqlx::Error> {
        sqlx::query_as::<_, Lang>(concat!(
            lang_select!(),
            " WHERE a.lang_code = $1 ORDER BY a.lang_id LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(conn)
        .await
    }

    pub async fn insert(
        conn: &mut PgConnection,
        lang: &LangRequest,
        actor: Option<DbId>,
        now: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            r#"INSERT INTO lang (lang_code, lang_name, created_by, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING lang_id"#,
        )
        .bind(&lang.lang_code)
        .bind(&lang.lang_name)
        .bind(actor)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        lang: &LangRequest,
        actor: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE lang SET lang_code = $2, lang_name = $3, updated_by = $4, updated_at = $5
               WHERE lang_id = $1"#,
        )
        .bind(id)
        .bind(&lang.lang_code)
        .bind(&lang.lang_name)
        .bind(actor)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lang WHERE lang_id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
