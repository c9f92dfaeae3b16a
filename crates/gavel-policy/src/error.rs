//! Policy violation types.
//!
//! Violations are plain values returned to the caller, never faults. The
//! display strings are the user-facing messages the gateway hands back to
//! the MCP client, so they name the offending keyword or tables and, for
//! allowlist misses, enumerate the full allowed set for guidance.

use thiserror::Error;

/// A rejected statement, categorized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// A mutating keyword was found as a whole word.
    #[error("Write operations ({keyword}) are not allowed. This server is read-only.")]
    WriteOperation { keyword: String },

    /// One or more referenced tables are outside the allowlist.
    #[error(
        "Query references unauthorized table(s): {}. Allowed tables: {}",
        tables.join(", "),
        allowed.join(", ")
    )]
    UnauthorizedTables {
        /// The disallowed tables referenced, sorted and deduplicated.
        tables: Vec<String>,
        /// The full allowlist, sorted.
        allowed: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_operation_message() {
        let violation = PolicyViolation::WriteOperation {
            keyword: "DROP".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "Write operations (DROP) are not allowed. This server is read-only."
        );
    }

    #[test]
    fn unauthorized_tables_message_lists_both_sets() {
        let violation = PolicyViolation::UnauthorizedTables {
            tables: vec!["secret_table".to_string()],
            allowed: vec!["items".to_string(), "weekly_metrics_summary".to_string()],
        };
        let message = violation.to_string();
        assert!(message.contains("unauthorized table(s): secret_table"));
        assert!(message.contains("Allowed tables: items, weekly_metrics_summary"));
    }
}
