//! Table allowlist configuration.
//!
//! Only the tables listed here can be referenced through the gateway. The
//! default set covers the auction items table and the weekly metrics
//! rollups exposed to reporting agents.

use serde::{Deserialize, Serialize};

/// Allowlist section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowlistConfig {
    /// Table names callers may reference. Matching is case-insensitive.
    #[serde(default = "default_tables")]
    pub tables: Vec<String>,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            tables: default_tables(),
        }
    }
}

fn default_tables() -> Vec<String> {
    [
        "items",
        "weekly_metrics_summary",
        "weekly_metrics_by_category",
        "weekly_metrics_by_business_category",
        "weekly_metrics_by_industry",
        "weekly_metrics_by_family",
        "weekly_metrics_by_region",
        "weekly_metrics_by_district",
        "weekly_metrics_by_territory",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
