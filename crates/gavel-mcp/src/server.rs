//! MCP server implementation.
//!
//! Handles tool discovery and execution over stdio or HTTP transport.

use crate::error::McpError;
use crate::executor::{ExecutionResult, ToolExecutor};
use crate::http_transport::HttpServer;
use crate::protocol::*;
use crate::tools::{ToolRegistry, builtin_tools};
use gavel_adapter_pg::PostgresAdapter;
use gavel_core::config::mcp::{McpConfig, Transport};
use serde_json::{Value, json};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    config: McpConfig,
    tools: ToolRegistry,
    executor: Option<ToolExecutor>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration. Tools are
    /// registered when an adapter is attached.
    pub fn new(config: McpConfig) -> Self {
        Self {
            config,
            tools: ToolRegistry::new(),
            executor: None,
        }
    }

    /// Attach the database adapter and register the built-in tool set for
    /// its access policy.
    pub fn with_adapter(mut self, adapter: Arc<PostgresAdapter>) -> Self {
        for tool in builtin_tools(adapter.policy()) {
            self.tools.register(tool);
        }
        self.executor = Some(ToolExecutor::new(adapter));
        self
    }

    /// The registered tools.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Start the MCP server.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Run the server with stdio transport.
    async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!("Starting MCP server with stdio transport");

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut stdout_lock = stdout.lock();

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = serde_json::from_str(&line)?;
            let response = self.handle_request(request).await;
            let response_json = serde_json::to_string(&response)?;

            writeln!(stdout_lock, "{}", response_json)?;
            stdout_lock.flush()?;
        }

        Ok(())
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            "Starting MCP server with HTTP transport"
        );

        let (request_tx, mut request_rx) =
            mpsc::channel::<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>(100);

        let server = self.clone();
        tokio::spawn(async move {
            while let Some((request, response_tx)) = request_rx.recv().await {
                let response = server.handle_request(request).await;
                let _ = response_tx.send(response).await;
            }
        });

        let http_server = HttpServer::new(&self.config.host, self.config.port, request_tx);
        http_server.run().await
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(
                id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": "2024-11-05",
            "serverInfo": {
                "name": "gavel-mcp",
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<_> = self
            .tools
            .list()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                    "annotations": t.annotations
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, format!("Invalid params: {}", e));
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        if !self.tools.contains(&params.name) {
            return JsonRpcResponse::error(id, -32602, format!("Tool not found: {}", params.name));
        }

        let Some(executor) = &self.executor else {
            return JsonRpcResponse::error(id, -32603, "No database adapter configured");
        };

        let result = executor.execute(&params.name, params.arguments).await;
        self.execution_result_to_response(id, result)
    }

    fn execution_result_to_response(
        &self,
        id: Option<Value>,
        result: ExecutionResult,
    ) -> JsonRpcResponse {
        let response = json!({
            "content": result.content.iter().map(|c| match c {
                ToolContent::Text { text } => json!({"type": "text", "text": text}),
                ToolContent::Json { json } => json!({"type": "json", "json": json}),
            }).collect::<Vec<_>>(),
            "isError": !result.success
        });
        JsonRpcResponse::success(id, response)
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP server shutdown requested");
        JsonRpcResponse::success(id, json!(null))
    }
}
