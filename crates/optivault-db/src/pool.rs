use deadpool_diesel::postgres::Pool;

use crate::errors::{DatabaseError, DbFailure};

/// Runs blocking diesel work on a pooled connection, tagging failures with
/// the operation that caused them.
pub trait OptivaultPool {
    /// ```ignore
    /// let user = pool
    ///     .interact_with_context("find user".into(), move |conn| {
    ///         User::find_by_wallet(&wallet, conn)
    ///     })
    ///     .await?;
    /// ```
    fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> impl std::future::Future<Output = Result<T, DatabaseError>> + Send
    where
        F: FnOnce(&mut diesel::PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DbFailure> + Send + 'static;
}

impl OptivaultPool for Pool {
    async fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut diesel::PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DbFailure> + Send + 'static,
    {
        let outcome = match self.get().await {
            Ok(conn) => match conn.interact(f).await {
                Ok(result) => result.map_err(Into::into),
                Err(e) => Err(DbFailure::Interaction(e.to_string())),
            },
            Err(e) => Err(DbFailure::Pool(e.to_string())),
        };

        outcome.map_err(|failure| {
            let err = DatabaseError::new(&operation, failure);
            // Misses are expected on lookups; callers decide how loud to be.
            if !err.is_not_found() {
                tracing::error!(
                    operation = %operation,
                    error = %err.failure,
                    "🗃️ Database read failed"
                );
            }
            err
        })
    }
}
