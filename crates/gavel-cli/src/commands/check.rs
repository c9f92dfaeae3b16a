//! `gavel check` verifies configuration and upstream connectivity.

use anyhow::{Context, Result};
use gavel_adapter_pg::PostgresAdapter;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let (config, policy) = super::load_config(config_path)?;

    println!("Configuration: ok ({})", config_path.display());
    println!(
        "  project:   {}",
        config.project.as_deref().unwrap_or("(unnamed)")
    );
    println!(
        "  upstream:  {}:{}/{}",
        config.upstream.host, config.upstream.port, config.upstream.database
    );
    println!("  transport: {:?}", config.mcp.transport);
    println!("  allowlist: {} tables", policy.len());

    let adapter = PostgresAdapter::connect(&config.upstream, policy)
        .await
        .context("failed to connect to upstream database")?;
    adapter.ping().await.context("connectivity check failed")?;

    println!("Database:      ok");
    Ok(())
}
