//! The fixed table allowlist.

use gavel_core::config::AllowlistConfig;
use std::collections::BTreeSet;

/// Immutable, case-insensitive set of table names a caller may reference.
///
/// Constructed once at startup and never mutated. Membership is binary;
/// there is no per-grant state. Names are stored lowercased and listed in
/// sorted order so display output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    tables: BTreeSet<String>,
}

impl AccessPolicy {
    /// Build a policy from table names. Duplicates (including duplicates
    /// that differ only in case) collapse to a single entry.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tables = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self { tables }
    }

    /// Case-insensitive exact membership test. Absence is simply `false`.
    pub fn is_allowed(&self, table: &str) -> bool {
        self.tables.contains(&table.to_lowercase())
    }

    /// All allowed table names, sorted.
    pub fn tables(&self) -> Vec<&str> {
        self.tables.iter().map(|s| s.as_str()).collect()
    }

    /// All allowed table names as owned strings, sorted.
    pub fn tables_owned(&self) -> Vec<String> {
        self.tables.iter().cloned().collect()
    }

    /// Number of allowed tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the policy allows nothing at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl From<&AllowlistConfig> for AccessPolicy {
    fn from(config: &AllowlistConfig) -> Self {
        Self::new(&config.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_case_insensitive() {
        let policy = AccessPolicy::new(["Items", "weekly_metrics_summary"]);
        assert!(policy.is_allowed("items"));
        assert!(policy.is_allowed("ITEMS"));
        assert!(policy.is_allowed("Weekly_Metrics_Summary"));
        assert!(!policy.is_allowed("secret_table"));
    }

    #[test]
    fn duplicates_collapse() {
        let policy = AccessPolicy::new(["items", "Items", "ITEMS"]);
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn listing_is_sorted() {
        let policy = AccessPolicy::new(["zebra", "alpha", "middle"]);
        assert_eq!(policy.tables(), vec!["alpha", "middle", "zebra"]);
    }

    #[test]
    fn from_default_config() {
        let policy = AccessPolicy::from(&AllowlistConfig::default());
        assert!(policy.is_allowed("items"));
        assert!(policy.is_allowed("weekly_metrics_by_region"));
        assert_eq!(policy.len(), 9);
    }
}
