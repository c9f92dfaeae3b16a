//! Filter validation errors.

use thiserror::Error;

/// A filter field violated its stated bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("invalid filter field '{field}': {reason}")]
    MalformedFilter {
        /// The offending field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl FilterError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedFilter {
            field,
            reason: reason.into(),
        }
    }
}
