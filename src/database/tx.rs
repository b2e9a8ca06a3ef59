use sqlx::{PgConnection, Postgres, Transaction};

/// One transaction spanning a single service operation.
///
/// Repositories run against [`UnitOfWork::conn`]. The operation's result is
/// handed to [`UnitOfWork::finish`], which commits on `Ok` and rolls back on
/// `Err`. A unit of work dropped without `finish` (early return, panic,
/// cancelled request) is rolled back by sqlx when the transaction drops.
///
/// ```ignore
/// let mut uow = db.begin().await?;
/// let result = async {
///     let id = LangRepository::insert(uow.conn(), &request, Some(actor)).await?;
///     LangRepository::find_by_id(uow.conn(), id).await
/// }
/// .await;
/// uow.finish(result).await
/// ```
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork {
    pub(crate) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Commit iff `result` is `Ok`.
    ///
    /// The triggering error is always returned to the caller; a failing
    /// rollback is logged and never replaces it. A failing commit is returned.
    pub async fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E>
    where
        E: From<sqlx::Error>,
    {
        match result {
            Ok(value) => {
                self.tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.tx.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }
}
