//! MCP server for the Gavel gateway.
//!
//! Exposes four read-only tools over JSON-RPC (stdio or HTTP transport):
//! `get_auction_items`, `query_database`, `describe_table`, `list_tables`.
//! Every tool call goes through the access policy before touching the
//! database; rejections come back as tool error content, never faults.

pub mod error;
pub mod executor;
pub mod http_transport;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::McpError;
pub use executor::{ExecutionResult, ToolExecutor};
pub use server::McpServer;
