//! Adapter error taxonomy.
//!
//! Local, recoverable outcomes (policy violations, malformed filters,
//! missing tables) are distinct variants; infrastructure errors from sqlx
//! pass through transparently and are never reinterpreted or retried here.

use gavel_policy::PolicyViolation;
use gavel_query::FilterError;
use thiserror::Error;

/// Errors produced by the Postgres adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The statement or table reference violated the access policy.
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// A filter field violated its stated bound.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// An allowed table name matched no columns in the schema catalog.
    #[error("Table '{0}' not found in database")]
    TableNotFound(String),

    /// A plan value could not be encoded for binding.
    #[error("failed to bind query parameter: {0}")]
    Bind(String),

    /// Infrastructure error from the database driver.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AdapterError {
    /// Whether this is one of the local policy/validation outcomes, as
    /// opposed to an infrastructure failure.
    pub fn is_local(&self) -> bool {
        !matches!(self, AdapterError::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_not_found_message() {
        let err = AdapterError::TableNotFound("items".to_string());
        assert_eq!(err.to_string(), "Table 'items' not found in database");
        assert!(err.is_local());
    }

    #[test]
    fn policy_violation_message_passes_through() {
        let err = AdapterError::from(PolicyViolation::WriteOperation {
            keyword: "DELETE".to_string(),
        });
        assert!(err.to_string().contains("read-only"));
        assert!(err.is_local());
    }
}
