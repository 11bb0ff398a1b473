use crate::error::PipelineError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub aligner: AlignerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Minimum number of identical valid tags needed to found a cluster, and
    /// minimum retained membership for a cluster to survive filtering.
    #[serde(default = "default_min_coverage")]
    pub min_coverage: usize,
    /// Cap on retained reads per cluster after ranking by edit distance.
    #[serde(default = "default_max_reads_per_cluster")]
    pub max_reads_per_cluster: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// Path to the bwa executable; looked up on PATH when unset.
    #[serde(default)]
    pub executable: Option<PathBuf>,
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: u32,
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Keep index, query and report files next to the outputs.
    #[serde(default)]
    pub keep_intermediate: bool,
}

fn default_min_coverage() -> usize {
    10
}

fn default_max_reads_per_cluster() -> usize {
    100
}

fn default_max_edit_distance() -> u32 {
    2
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_coverage: default_min_coverage(),
            max_reads_per_cluster: default_max_reads_per_cluster(),
        }
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            executable: None,
            max_edit_distance: default_max_edit_distance(),
            threads: default_threads(),
            keep_intermediate: false,
        }
    }
}

impl Config {
    /// Load the user configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                if let Ok(content) = fs::read_to_string(&config_path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => log::warn!(
                            "Ignoring unparsable config {}: {}",
                            config_path.display(),
                            e
                        ),
                    }
                }
            }
        }
        Config::default()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "tagbin", "tagbin")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let clustering = &self.clustering;
        if clustering.min_coverage == 0 {
            return Err(PipelineError::invalid_config("min_coverage must be at least 1"));
        }
        if clustering.max_reads_per_cluster < clustering.min_coverage {
            return Err(PipelineError::invalid_config(format!(
                "max_reads_per_cluster ({}) is below min_coverage ({}); no cluster could survive filtering",
                clustering.max_reads_per_cluster, clustering.min_coverage
            )));
        }
        if self.aligner.threads == 0 {
            return Err(PipelineError::invalid_config("threads must be at least 1"));
        }
        Ok(())
    }
}
