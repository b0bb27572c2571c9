use crate::colors::*;
use crate::import::extract_preferred_versions;
use anyhow::{Context, Result};
use std::path::Path;

pub fn cmd_import(dir: &Path) -> Result<()> {
    let preferred = extract_preferred_versions(dir)
        .with_context(|| format!("import lockfile from {}", dir.display()))?;
    let versions: usize = preferred.values().map(|v| v.len()).sum();
    eprintln!(
        "{gray}[pacm]{reset} {green}import{reset} {count} packages, {versions} versions",
        gray = C_GRAY,
        green = C_GREEN,
        reset = C_RESET,
        count = preferred.len()
    );
    println!("{}", serde_json::to_string_pretty(&preferred)?);
    Ok(())
}
