//! Whole-batch failures that abort a run.
//!
//! Per-record anomalies (invalid tags, reads the aligner cannot place) are
//! expected noise and never surface here; they are counted and logged instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No sequence records found in '{source_name}'. Please check the tag extraction step")]
    EmptyInput { source_name: String },

    #[error(
        "No sequence was seen at least {min_coverage} times among {valid_records} valid records"
    )]
    NoClustersFound {
        min_coverage: usize,
        valid_records: usize,
    },

    #[error(
        "The aligner placed none of the {queries} submitted sequences on a cluster representative ({exact_matches} reads matched exactly)"
    )]
    NoAlignmentsFound {
        queries: usize,
        exact_matches: usize,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl PipelineError {
    pub fn empty_input(source_name: impl Into<String>) -> Self {
        Self::EmptyInput {
            source_name: source_name.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
