//! Store-level error type.

use inkwell_core::error::CoreError;

/// Errors surfaced by a [`DraftStore`](crate::store::DraftStore).
///
/// Domain failures keep their [`CoreError`] kind; anything else from the
/// database stays a raw [`sqlx::Error`] for the HTTP layer to classify.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    /// Unique violations on constraints named `uq_*` become `Conflict`; every
    /// other database error passes through untouched.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return StoreError::Core(CoreError::Conflict(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    )));
                }
            }
        }
        StoreError::Database(err)
    }
}

impl StoreError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            StoreError::Core(core) => Some(core),
            StoreError::Database(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_row_not_found_stays_database_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, StoreError::Database(sqlx::Error::RowNotFound));
        assert!(err.as_core().is_none());
    }

    #[test]
    fn test_core_error_is_preserved() {
        let err = StoreError::from(CoreError::Conflict("dup".into()));
        assert_matches!(err.as_core(), Some(CoreError::Conflict(msg)) if msg == "dup");
    }
}
