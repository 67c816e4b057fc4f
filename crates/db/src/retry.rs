//! Single-retry wrapper for idempotent reads.
//!
//! Reads that fail on a transient connection problem are attempted exactly
//! once more. Writes never go through here: retrying an insert without an
//! idempotency key could allocate a second version number or open a second
//! submission.

use std::future::Future;

/// Whether `err` is a transient connectivity failure worth one more attempt.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
}

/// Run `op`, retrying once if the first attempt fails transiently.
pub async fn read_with_retry<T, F, Fut>(label: &'static str, mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match op().await {
        Err(err) if is_transient(&err) => {
            tracing::warn!(query = label, error = %err, "Transient read failure, retrying once");
            op().await
        }
        other => other,
    }
}
