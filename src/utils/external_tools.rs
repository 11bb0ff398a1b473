use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;

/// Resolve the bwa executable, preferring an explicitly configured path, and
/// check that it starts. `bwa` without arguments prints its usage and exits
/// non-zero, so only a failure to spawn counts as missing.
pub fn check_bwa(configured: Option<&Path>) -> Result<PathBuf> {
    let executable = match configured {
        Some(path) => path.to_path_buf(),
        None => which("bwa").map_err(|e| {
            anyhow!("bwa not found ({e}). Please install bwa (https://github.com/lh3/bwa) and ensure it's in your PATH")
        })?,
    };

    Command::new(&executable)
        .output()
        .with_context(|| format!("Failed to start bwa at {}", executable.display()))?;

    Ok(executable)
}
