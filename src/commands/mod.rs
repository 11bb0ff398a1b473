pub mod barcodes;
pub mod flycodes;

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Where the aligner keeps its index, queries and report: a scratch
/// directory removed on drop, or `{output_dir}/alignment` when the files are
/// to be kept.
pub(crate) enum AlignmentWorkspace {
    Scratch(TempDir),
    Kept(PathBuf),
}

impl AlignmentWorkspace {
    pub(crate) fn create(config: &Config, output_dir: &Path) -> Result<Self> {
        if config.aligner.keep_intermediate {
            let dir = output_dir.join("alignment");
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            Ok(AlignmentWorkspace::Kept(dir))
        } else {
            let dir = tempfile::Builder::new()
                .prefix("tagbin-align-")
                .tempdir()
                .context("Failed to create a scratch directory for the aligner")?;
            Ok(AlignmentWorkspace::Scratch(dir))
        }
    }

    pub(crate) fn path(&self) -> &Path {
        match self {
            AlignmentWorkspace::Scratch(dir) => dir.path(),
            AlignmentWorkspace::Kept(dir) => dir,
        }
    }
}

pub(crate) fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))
}
