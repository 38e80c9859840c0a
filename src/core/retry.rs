//! Bounded retry for transient database write conflicts.
//!
//! SQLite serializes writers; a second writer sees a busy/locked error
//! instead of a partially applied update. Mutating operations re-run the
//! whole transaction a bounded number of times before surfacing `Conflict`.

use crate::errors::{Error, Result};
use std::future::Future;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;

/// Returns true when a database error is a transient serialization failure
/// worth retrying rather than a real fault.
fn is_serialization_failure(err: &sea_orm::DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("busy")
}

/// Runs `op` up to three times, retrying on transient write conflicts. Any
/// other outcome (success or a non-transient error) is returned
/// immediately. The closure must restart its own database transaction on
/// every call.
pub async fn with_conflict_retry<T, F, Fut>(operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(Error::Database(db_err)) if is_serialization_failure(&db_err) => {
                if attempt >= MAX_ATTEMPTS {
                    return Err(Error::Conflict {
                        message: format!(
                            "{operation} failed after {MAX_ATTEMPTS} attempts: {db_err}"
                        ),
                    });
                }
                warn!(operation, attempt, error = %db_err, "retrying after write conflict");
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_success_passes_through() -> Result<()> {
        let value = with_conflict_retry("op", || async { Ok(42) }).await?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_transient_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_conflict_retry("op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(Error::TransactionNotFound { id: 1 })
            }
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            Error::TransactionNotFound { id: 1 }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_error_retried_then_succeeds() -> Result<()> {
        let calls = AtomicU32::new(0);
        let value = with_conflict_retry("op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(Error::Database(sea_orm::DbErr::Custom(
                        "database is locked".to_string(),
                    )))
                } else {
                    Ok(7)
                }
            }
        })
        .await?;

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_conflict() {
        let result: Result<()> = with_conflict_retry("op", || async {
            Err(Error::Database(sea_orm::DbErr::Custom(
                "database is locked".to_string(),
            )))
        })
        .await;

        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));
    }
}
