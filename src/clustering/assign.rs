use super::representatives::ClusterTable;
use crate::aligner::{AlignParams, Aligner, AlignmentOutcome};
use crate::types::{Assignment, AssignmentSource, ClassifiedRecord, ClusterId, SequenceRecord};
use anyhow::Result;
use std::collections::{HashMap, HashSet};

/// Result of exact matching: settled assignments, and everything that still
/// needs the aligner.
#[derive(Debug, Clone, Default)]
pub struct ExactAssignments {
    pub assignments: Vec<Assignment>,
    pub unassigned: Vec<SequenceRecord>,
}

/// Assign every record whose sequence equals a representative, at edit
/// distance 0, without consulting the aligner.
pub fn assign_exact(records: &[ClassifiedRecord], clusters: &ClusterTable) -> ExactAssignments {
    let mut result = ExactAssignments::default();
    for classified in records {
        let record = &classified.record;
        match clusters.lookup_sequence(&record.sequence) {
            Some(cluster_id) => result.assignments.push(Assignment::exact(
                record.read_name(),
                cluster_id,
                record.sequence.len(),
            )),
            None => result.unassigned.push(record.clone()),
        }
    }

    log::info!(
        "{} records match a representative exactly, {} left for alignment",
        result.assignments.len(),
        result.unassigned.len()
    );
    result
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub submitted: usize,
    pub matched: usize,
    /// Queries the aligner could not place. Expected noise, never an error.
    pub unmatched: usize,
    /// Outcomes naming an unknown reference or a query that was not submitted.
    pub rejected: usize,
}

/// Place the records that did not match exactly on the nearest
/// representative using `aligner`.
///
/// Unplaced queries are dropped and counted in the returned stats.
pub fn assign_approximate<A: Aligner>(
    queries: &[SequenceRecord],
    clusters: &ClusterTable,
    aligner: &A,
    params: &AlignParams,
) -> Result<(Vec<Assignment>, AlignmentStats)> {
    let mut stats = AlignmentStats {
        submitted: queries.len(),
        ..AlignmentStats::default()
    };
    if queries.is_empty() {
        return Ok((Vec::new(), stats));
    }

    let index = aligner.index(&clusters.reference_records())?;
    let outcomes = aligner.align(queries, &index, params)?;

    let submitted: HashSet<&str> = queries.iter().map(|q| q.read_name()).collect();
    let mut assignments: Vec<Assignment> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();

    for outcome in outcomes {
        let hit = match outcome {
            AlignmentOutcome::Mapped(hit) => hit,
            AlignmentOutcome::Unmapped { query_id } => {
                log::debug!("No acceptable match for {}", query_id);
                stats.unmatched += 1;
                continue;
            }
        };

        if !submitted.contains(hit.query_id.as_str()) {
            log::debug!("Ignoring alignment for unknown query {}", hit.query_id);
            stats.rejected += 1;
            continue;
        }
        let cluster_id = match hit.reference_id.parse::<ClusterId>() {
            Ok(id) if clusters.contains(id) => id,
            _ => {
                log::debug!(
                    "Ignoring alignment of {} to unknown reference {}",
                    hit.query_id,
                    hit.reference_id
                );
                stats.rejected += 1;
                continue;
            }
        };

        let assignment = Assignment {
            read_id: hit.query_id,
            cluster_id,
            cigar: hit.cigar,
            edit_distance: hit.edit_distance,
            source: AssignmentSource::Approximate,
        };
        match position.get(&assignment.read_id) {
            Some(&i) => {
                if assignment.edit_distance < assignments[i].edit_distance {
                    assignments[i] = assignment;
                }
            }
            None => {
                position.insert(assignment.read_id.clone(), assignments.len());
                assignments.push(assignment);
            }
        }
    }

    stats.matched = assignments.len();
    log::info!(
        "Aligner placed {} of {} sequences ({} unmatched)",
        stats.matched,
        stats.submitted,
        stats.unmatched
    );
    Ok((assignments, stats))
}
