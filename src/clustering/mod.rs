//! Two-stage clustering of noisy tags.
//!
//! Representatives are founded by exact-match frequency, every other read is
//! placed on its nearest representative, and per-cluster membership is then
//! ranked, capped and re-checked against the coverage threshold.

pub mod assign;
pub mod classify;
pub mod filter;
pub mod materialize;
pub mod representatives;

pub use assign::{assign_approximate, assign_exact, AlignmentStats, ExactAssignments};
pub use classify::{classify, ValidityPattern, FLYCODE_PATTERN};
pub use filter::{filter_by_coverage, FilterParams, FilteredAssignments};
pub use representatives::{
    select_representatives, ClusterTable, IdGenerator, RandomIdGenerator, SequentialIdGenerator,
};

use crate::aligner::{AlignParams, Aligner};
use crate::config::Config;
use crate::error::PipelineError;
use crate::types::{Assignment, ClassifiedRecord, SequenceRecord};
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusteringParams {
    pub min_coverage: usize,
    pub max_reads_per_cluster: usize,
    pub align: AlignParams,
}

impl ClusteringParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_coverage: config.clustering.min_coverage,
            max_reads_per_cluster: config.clustering.max_reads_per_cluster,
            align: AlignParams {
                max_edit_distance: config.aligner.max_edit_distance,
                threads: config.aligner.threads,
            },
        }
    }

    fn filter(&self) -> FilterParams {
        FilterParams {
            min_coverage: self.min_coverage,
            max_per_cluster: self.max_reads_per_cluster,
        }
    }
}

/// Everything a run produced, stage by stage.
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    pub classified: Vec<ClassifiedRecord>,
    pub clusters: ClusterTable,
    /// Exact assignments followed by aligner assignments, before filtering.
    pub assignments: Vec<Assignment>,
    pub filtered: FilteredAssignments,
    pub alignment: AlignmentStats,
}

impl ClusteringOutcome {
    pub fn log_summary(&self) {
        let valid = self.classified.iter().filter(|c| c.is_valid).count();
        log::info!(
            "Reads: {} ({} valid); clusters: {} founded, {} kept; assignments: {} exact, {} aligned, {} unmatched; retained reads: {}",
            self.classified.len(),
            valid,
            self.clusters.len(),
            self.filtered.cluster_count(),
            self.assignments.len() - self.alignment.matched,
            self.alignment.matched,
            self.alignment.unmatched,
            self.filtered.len()
        );
        if self.filtered.is_empty() {
            log::warn!("No cluster kept enough reads after filtering; outputs will be empty");
        }
    }
}

/// Run classification, representative selection, exact and approximate
/// assignment and coverage filtering over `records`.
pub fn run_clustering<A: Aligner>(
    records: Vec<SequenceRecord>,
    pattern: &ValidityPattern,
    params: &ClusteringParams,
    aligner: &A,
    ids: &mut dyn IdGenerator,
) -> Result<ClusteringOutcome> {
    if records.is_empty() {
        return Err(PipelineError::empty_input("input records").into());
    }

    let classified = classify(records, pattern);
    let clusters = select_representatives(&classified, params.min_coverage, ids)?;

    let ExactAssignments {
        mut assignments,
        unassigned,
    } = assign_exact(&classified, &clusters);
    let (aligned, alignment) = assign_approximate(&unassigned, &clusters, aligner, &params.align)?;

    // Leftovers that all fail to place point at a broken index, not noise.
    if alignment.submitted > 0 && alignment.matched == 0 {
        return Err(PipelineError::NoAlignmentsFound {
            queries: alignment.submitted,
            exact_matches: assignments.len(),
        }
        .into());
    }
    assignments.extend(aligned);

    let filtered = filter_by_coverage(&assignments, params.filter());

    Ok(ClusteringOutcome {
        classified,
        clusters,
        assignments,
        filtered,
        alignment,
    })
}
