//! Tool registry and the built-in read-only tool set.

use crate::protocol::{ToolAnnotations, ToolDefinition};
use gavel_policy::AccessPolicy;
use serde_json::json;
use std::collections::BTreeMap;

/// Registry of available MCP tools, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    pub fn register(&mut self, tool: ToolDefinition) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tools in name order.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn read_only() -> Option<ToolAnnotations> {
    Some(ToolAnnotations {
        read_only: Some(true),
    })
}

/// The fixed tool set this gateway exposes. The allowlist is embedded in
/// the descriptions so agents see what they may reference before calling.
pub fn builtin_tools(policy: &AccessPolicy) -> Vec<ToolDefinition> {
    let allowed = policy.tables().join(", ");

    vec![
        ToolDefinition {
            name: "get_auction_items".to_string(),
            description: Some(
                "List auction items with optional filters. Returns items with all fields \
                 including fees. Use pagination for large result sets."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": { "type": "string", "description": "Filter by category" },
                    "date_from": { "type": "string", "description": "Start date (ISO format)" },
                    "date_to": { "type": "string", "description": "End date (ISO format)" },
                    "min_price": { "type": "number", "description": "Minimum hammer price" },
                    "max_price": { "type": "number", "description": "Maximum hammer price" },
                    "limit": { "type": "number", "default": 20, "description": "Number of results (max 100)" },
                    "offset": { "type": "number", "default": 0, "description": "Offset for pagination" }
                }
            }),
            annotations: read_only(),
        },
        ToolDefinition {
            name: "query_database".to_string(),
            description: Some(format!(
                "Execute a read-only SQL SELECT query. Write operations are rejected. \
                 Only these tables may be referenced: {allowed}."
            )),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "sql": { "type": "string", "description": "SQL SELECT query to execute" }
                },
                "required": ["sql"]
            }),
            annotations: read_only(),
        },
        ToolDefinition {
            name: "describe_table".to_string(),
            description: Some(
                "Describe a table's schema (columns, types, nullability).".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table_name": { "type": "string", "description": "Name of the table to describe" }
                },
                "required": ["table_name"]
            }),
            annotations: read_only(),
        },
        ToolDefinition {
            name: "list_tables".to_string(),
            description: Some("List all tables available through this gateway.".to_string()),
            input_schema: json!({ "type": "object", "properties": {} }),
            annotations: read_only(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_policy() -> AccessPolicy {
        AccessPolicy::new(["items", "weekly_metrics_summary"])
    }

    #[test]
    fn register_and_get() {
        let mut registry = ToolRegistry::new();
        for tool in builtin_tools(&sample_policy()) {
            registry.register(tool);
        }

        assert!(registry.get("query_database").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn listing_is_deterministic() {
        let mut registry = ToolRegistry::new();
        for tool in builtin_tools(&sample_policy()) {
            registry.register(tool);
        }
        let names: Vec<&str> = registry.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "describe_table",
                "get_auction_items",
                "list_tables",
                "query_database"
            ]
        );
    }

    #[test]
    fn query_tool_mentions_allowlist() {
        let tools = builtin_tools(&sample_policy());
        let query_tool = tools.iter().find(|t| t.name == "query_database").unwrap();
        assert!(
            query_tool
                .description
                .as_deref()
                .unwrap()
                .contains("items, weekly_metrics_summary")
        );
    }

    #[test]
    fn every_tool_is_read_only() {
        for tool in builtin_tools(&sample_policy()) {
            assert_eq!(
                tool.annotations.and_then(|a| a.read_only),
                Some(true),
                "tool {} missing readOnly annotation",
                tool.name
            );
        }
    }
}
