//! Storage error types for the warehouse backend.
//!
//! Everything that can go wrong below the domain layer (driver failures,
//! schema setup, rows that no longer decode) is reported through
//! [`BackendError`]. Callers treat all of these as internal failures.

use thiserror::Error;

/// Errors that can occur while talking to the SQL store.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// A sqlx operation failed.
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Context plus the driver's description of the failure
        reason: String,
        /// The underlying driver error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Schema creation or migration failed.
    #[error("Schema error: {reason}")]
    SchemaError {
        /// Description of the schema failure
        reason: String,
    },

    /// A stored row holds a value the domain types cannot represent.
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow {
        /// Table the row was read from
        table: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Rolling back a failed transaction also failed.
    #[error("Rollback failed after error: {original}")]
    RollbackFailed {
        /// Display form of the error that triggered the rollback
        original: String,
        /// The rollback failure itself
        #[source]
        source: sqlx::Error,
    },
}

impl BackendError {
    /// Check if this error came straight from the SQL driver.
    pub fn is_sql_error(&self) -> bool {
        matches!(
            self,
            BackendError::SqlxError { .. } | BackendError::RollbackFailed { .. }
        )
    }

    /// Check if this error indicates stored data the service cannot trust.
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, BackendError::CorruptRow { .. })
    }

    /// Check if this error was raised while preparing the schema.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, BackendError::SchemaError { .. })
    }

    /// Check if the driver reported a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            BackendError::SqlxError {
                source: Some(sqlx::Error::Database(db_err)),
                ..
            } => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
