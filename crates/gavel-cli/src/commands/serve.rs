//! `gavel serve` starts the MCP server against the configured upstream.

use anyhow::{Result, bail};
use gavel_adapter_pg::PostgresAdapter;
use gavel_core::config::Transport;
use gavel_mcp::McpServer;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn run(config_path: &Path, transport: Option<&str>, port: Option<u16>) -> Result<()> {
    let (mut config, policy) = super::load_config(config_path)?;

    if let Some(transport) = transport {
        config.mcp.transport = match transport {
            "stdio" => Transport::Stdio,
            "http" => Transport::Http,
            other => bail!("unknown transport '{}' (expected stdio or http)", other),
        };
    }
    if let Some(port) = port {
        config.mcp.port = port;
    }

    if !config.mcp.enabled {
        bail!("MCP server is disabled in configuration");
    }

    info!(
        project = config.project.as_deref().unwrap_or("gavel"),
        tables = policy.len(),
        "starting gavel"
    );

    let adapter = PostgresAdapter::connect(&config.upstream, policy).await?;
    let server = McpServer::new(config.mcp).with_adapter(Arc::new(adapter));

    server.run().await?;
    Ok(())
}
