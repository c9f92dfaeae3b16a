//! Tool execution engine.
//!
//! Maps tool calls onto the Postgres adapter and formats results as MCP
//! content. Policy rejections and malformed arguments come back as error
//! content for the client; infrastructure failures are logged and passed
//! through with a distinct prefix, never retried here.

use crate::protocol::ToolContent;
use gavel_adapter_pg::PostgresAdapter;
use gavel_query::ItemFilter;
use serde_json::{Value, json};
use std::sync::Arc;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The result content.
    pub content: Vec<ToolContent>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Create a successful result with JSON content.
    pub fn success_json(value: Value) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Json { json: value }],
            error: None,
        }
    }

    /// Create a successful result with text content.
    pub fn success_text(text: impl Into<String>) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Text { text: text.into() }],
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            success: false,
            content: vec![ToolContent::Text { text: msg.clone() }],
            error: Some(msg),
        }
    }
}

/// The tool executor runs tools against the adapter.
#[derive(Clone)]
pub struct ToolExecutor {
    adapter: Arc<PostgresAdapter>,
}

impl ToolExecutor {
    /// Create a new tool executor over an adapter handle.
    pub fn new(adapter: Arc<PostgresAdapter>) -> Self {
        Self { adapter }
    }

    /// Execute a tool call by name.
    pub async fn execute(&self, name: &str, arguments: Value) -> ExecutionResult {
        match name {
            "get_auction_items" => self.get_auction_items(arguments).await,
            "query_database" => self.query_database(arguments).await,
            "describe_table" => self.describe_table(arguments).await,
            "list_tables" => self.list_tables(),
            other => ExecutionResult::error(format!("Unknown tool: {other}")),
        }
    }

    async fn get_auction_items(&self, arguments: Value) -> ExecutionResult {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };
        let filter: ItemFilter = match serde_json::from_value(arguments) {
            Ok(filter) => filter,
            Err(e) => return ExecutionResult::error(format!("Invalid arguments: {e}")),
        };

        match self.adapter.fetch_items(&filter).await {
            Ok(items) => {
                let formatted: Vec<String> = items.iter().map(format_item).collect();
                ExecutionResult::success_text(format!(
                    "Found {} items:\n\n{}",
                    items.len(),
                    formatted.join("\n\n")
                ))
            }
            Err(e) => adapter_error(e),
        }
    }

    async fn query_database(&self, arguments: Value) -> ExecutionResult {
        let sql = match arguments.get("sql").and_then(Value::as_str) {
            Some(sql) => sql,
            None => return ExecutionResult::error("Missing required argument 'sql'"),
        };

        match self.adapter.execute_query(sql).await {
            Ok(result) => ExecutionResult::success_json(json!({
                "columns": result.columns,
                "rows": result.rows,
                "row_count": result.row_count,
            })),
            Err(e) => adapter_error(e),
        }
    }

    async fn describe_table(&self, arguments: Value) -> ExecutionResult {
        let table = match arguments.get("table_name").and_then(Value::as_str) {
            Some(table) => table,
            None => return ExecutionResult::error("Missing required argument 'table_name'"),
        };

        match self.adapter.describe_table(table).await {
            Ok(columns) => {
                let lines: Vec<String> = columns
                    .iter()
                    .map(|c| {
                        format!(
                            "  {}: {} ({})",
                            c.name,
                            c.data_type,
                            if c.nullable { "nullable" } else { "not null" }
                        )
                    })
                    .collect();
                ExecutionResult::success_text(format!("Table {}:\n{}", table, lines.join("\n")))
            }
            Err(e) => adapter_error(e),
        }
    }

    fn list_tables(&self) -> ExecutionResult {
        ExecutionResult::success_json(json!({
            "tables": self.adapter.policy().tables(),
        }))
    }
}

fn adapter_error(err: gavel_adapter_pg::AdapterError) -> ExecutionResult {
    if err.is_local() {
        ExecutionResult::error(err.to_string())
    } else {
        tracing::error!(error = %err, "database error during tool execution");
        ExecutionResult::error(format!("Database error: {err}"))
    }
}

fn text_field(item: &Value, key: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn money_field(item: &Value, key: &str) -> String {
    match item.get(key).and_then(Value::as_f64) {
        Some(n) => format!("${n}"),
        None => "$0".to_string(),
    }
}

/// Render one item the way reporting agents expect it: every field on its
/// own line, missing values as N/A, missing fees as $0.
fn format_item(item: &Value) -> String {
    format!(
        "Item {}:\n  Model: {}\n  Category: {}\n  Auction Date: {}\n  ICN: {}\n  \
         Hammer Price: {}\n  Contract Price: {}\n  Seller Service Fee: {}\n  Lot Fee: {}\n  \
         Power Washing: {}\n  Decal Removal: {}\n  Total Fees: {}",
        text_field(item, "unique_id"),
        text_field(item, "model"),
        text_field(item, "category"),
        text_field(item, "auctiondate"),
        text_field(item, "icn"),
        money_field(item, "hammer"),
        money_field(item, "contract_price"),
        money_field(item, "seller_service_fee"),
        money_field(item, "lot_fee"),
        money_field(item, "power_washing"),
        money_field(item, "decal_removal"),
        money_field(item, "total_fees"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_complete_item() {
        let item = json!({
            "unique_id": 12345,
            "model": "8R 370",
            "category": "Tractor",
            "auctiondate": "2024-03-15",
            "icn": "ABC-123",
            "hammer": 185000.0,
            "contract_price": 190000.0,
            "seller_service_fee": 500.0,
            "lot_fee": 95.0,
            "power_washing": 150.0,
            "decal_removal": 0.0,
            "total_fees": 745.0
        });
        let text = format_item(&item);
        assert!(text.starts_with("Item 12345:"));
        assert!(text.contains("Model: 8R 370"));
        assert!(text.contains("Hammer Price: $185000"));
        assert!(text.contains("Total Fees: $745"));
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let item = json!({ "unique_id": 7 });
        let text = format_item(&item);
        assert!(text.contains("Model: N/A"));
        assert!(text.contains("Hammer Price: $0"));
    }

    #[test]
    fn null_fields_render_placeholders() {
        let item = json!({ "unique_id": 7, "model": null, "hammer": null });
        let text = format_item(&item);
        assert!(text.contains("Model: N/A"));
        assert!(text.contains("Hammer Price: $0"));
    }

    #[test]
    fn error_result_carries_message_as_content() {
        let result = ExecutionResult::error("nope");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("nope"));
        match &result.content[0] {
            ToolContent::Text { text } => assert_eq!(text, "nope"),
            other => panic!("expected text content, got {other:?}"),
        }
    }
}
