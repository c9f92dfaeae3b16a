use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "gavel", version, about = "Read-only Postgres gateway for AI agents")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the MCP server.
    Serve {
        /// Configuration file path.
        #[arg(short, long, default_value = "gavel.yaml")]
        config: PathBuf,

        /// Transport type (stdio or http). Overrides the config file.
        #[arg(long)]
        transport: Option<String>,

        /// HTTP port (only for http transport). Overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Verify configuration and database connectivity.
    Check {
        /// Configuration file path.
        #[arg(short, long, default_value = "gavel.yaml")]
        config: PathBuf,
    },

    /// Print the table allowlist.
    Tables {
        /// Configuration file path.
        #[arg(short, long, default_value = "gavel.yaml")]
        config: PathBuf,

        /// Emit JSON instead of plain text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr: stdout belongs to the JSON-RPC stream under
    // stdio transport. GAVEL_LOG takes precedence over RUST_LOG.
    let filter = tracing_subscriber::EnvFilter::try_from_env("GAVEL_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve {
            config,
            transport,
            port,
        } => commands::serve::run(&config, transport.as_deref(), port).await?,

        Command::Check { config } => commands::check::run(&config).await?,

        Command::Tables { config, json } => commands::tables::run(&config, json)?,
    }

    Ok(())
}
