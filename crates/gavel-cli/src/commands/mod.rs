//! Command implementations.

pub mod check;
pub mod serve;
pub mod tables;

use anyhow::{Context, Result};
use gavel_core::config::GavelConfig;
use gavel_policy::AccessPolicy;
use std::path::Path;

/// Load the configuration file and build the access policy from its
/// allowlist section.
pub(crate) fn load_config(path: &Path) -> Result<(GavelConfig, AccessPolicy)> {
    let config = GavelConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    let policy = AccessPolicy::from(&config.allowlist);
    Ok((config, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_config_builds_policy_from_allowlist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "project: test\nallowlist:\n  tables:\n    - items\n    - sellers"
        )
        .unwrap();

        let (config, policy) = load_config(file.path()).unwrap();
        assert_eq!(config.project.as_deref(), Some("test"));
        assert!(policy.is_allowed("items"));
        assert!(!policy.is_allowed("users"));
    }

    #[test]
    fn load_config_missing_file_is_an_error() {
        let err = load_config(Path::new("/nonexistent/gavel.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gavel.yaml"));
    }
}
