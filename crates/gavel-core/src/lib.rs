use serde::{Deserialize, Serialize};

// Configuration types shared across all Gavel crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    AllowlistConfig, ConnectionPoolConfig, GavelConfig, McpConfig, Transport, UpstreamConfig,
};

/// Metadata for one column of a described table, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared Postgres data type (e.g. "integer", "character varying").
    pub data_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

/// Result of executing a read query: named columns plus rows as JSON objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in result order.
    pub columns: Vec<String>,
    /// One JSON object per row, keyed by column name.
    pub rows: Vec<serde_json::Value>,
    /// Number of rows returned.
    pub row_count: usize,
}

impl QueryResult {
    /// Build a result from rows, taking column names from the first row's keys.
    pub fn from_rows(columns: Vec<String>, rows: Vec<serde_json::Value>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
        }
    }
}
