//! `gavel tables` prints the configured table allowlist.

use anyhow::Result;
use serde_json::json;
use std::path::Path;

pub fn run(config_path: &Path, as_json: bool) -> Result<()> {
    let (_, policy) = super::load_config(config_path)?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "tables": policy.tables() }))?
        );
    } else {
        for table in policy.tables() {
            println!("{}", table);
        }
    }
    Ok(())
}
