//! Scoped transactions
//!
//! Commit when the callback succeeds, roll back and propagate when it fails.

use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};

use super::StoreError;

/// Run `work` as one all-or-nothing unit on a pooled connection.
///
/// The callback gets the transaction's connection and must not touch the
/// pool itself while it runs. Captured values have to be owned:
///
/// ```ignore
/// let name = name.to_owned();
/// in_transaction(pool, move |conn| Box::pin(async move {
///     sqlx::query("INSERT INTO ManagedList (name) VALUES (?)")
///         .bind(&name)
///         .execute(&mut *conn)
///         .await?;
///     Ok(())
/// }))
/// .await?;
/// ```
pub async fn in_transaction<T, F>(pool: &SqlitePool, work: F) -> Result<T, StoreError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, StoreError>> + Send,
{
    let mut tx = pool.begin().await?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
