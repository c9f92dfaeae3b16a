//! Configuration types for the Gavel read-only database gateway.
//!
//! Configuration is loaded from a single YAML file (`gavel.yaml`) and
//! combined into a `GavelConfig` structure. Credentials can be supplied
//! through environment variables referenced from the file, so the file
//! itself never has to contain secrets.

pub mod allowlist;
pub mod mcp;
pub mod upstream;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use allowlist::AllowlistConfig;
pub use mcp::{McpConfig, Transport};
pub use upstream::{ConnectionPoolConfig, UpstreamConfig};

/// Complete Gavel configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GavelConfig {
    /// Project name, for logs and server info.
    #[serde(default)]
    pub project: Option<String>,

    /// Upstream Postgres connection.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// MCP server settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Table allowlist.
    #[serde(default)]
    pub allowlist: AllowlistConfig,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl GavelConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml() {
        let yaml = r#"
project: auction-gateway
upstream:
  host: db.internal
  port: 5434
  database: dbt_dev
  username: dbt_user
mcp:
  transport: http
  port: 4100
"#;
        let config: GavelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.project.as_deref(), Some("auction-gateway"));
        assert_eq!(config.upstream.port, 5434);
        assert_eq!(config.mcp.port, 4100);
        assert!(config.mcp.is_http());
        // Allowlist falls back to the built-in table set.
        assert!(!config.allowlist.tables.is_empty());
    }

    #[test]
    fn defaults_apply_for_empty_config() {
        let config: GavelConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.upstream.port, 5434);
        assert!(config.mcp.enabled);
        assert!(config.mcp.is_stdio());
    }
}
