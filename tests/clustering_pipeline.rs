mod common;

use common::{levenshtein, mutate, records, LevenshteinAligner};
use tagbin::aligner::AlignParams;
use tagbin::clustering::{run_clustering, ClusteringParams, SequentialIdGenerator, ValidityPattern};
use tagbin::error::PipelineError;
use tagbin::types::{AssignmentSource, ClusterId, SequenceRecord};

const REPRESENTATIVE: &str = "ACGTACGTACGTACGTACGT";

fn params(min_coverage: usize, max_reads_per_cluster: usize) -> ClusteringParams {
    ClusteringParams {
        min_coverage,
        max_reads_per_cluster,
        align: AlignParams {
            max_edit_distance: 2,
            threads: 1,
        },
    }
}

fn any_acgt() -> ValidityPattern {
    ValidityPattern::new("^[ACGT]+$").unwrap()
}

fn pipeline_error(err: &anyhow::Error) -> &PipelineError {
    err.downcast_ref::<PipelineError>()
        .unwrap_or_else(|| panic!("expected a pipeline error, got {:#}", err))
}

#[test]
fn test_single_cluster_from_identical_reads() {
    let aligner = LevenshteinAligner::new();
    let outcome = run_clustering(
        records("r", REPRESENTATIVE, 15),
        &any_acgt(),
        &params(10, 100),
        &aligner,
        &mut SequentialIdGenerator::new(),
    )
    .unwrap();

    assert_eq!(outcome.clusters.len(), 1);
    let cluster = &outcome.clusters.clusters()[0];
    assert_eq!(cluster.representative, REPRESENTATIVE);
    assert_eq!(cluster.support, 15);
    assert_eq!(outcome.filtered.len(), 15);
    // Nothing left over, so the aligner is never asked.
    assert!(aligner.submitted().is_empty());
}

#[test]
fn test_too_few_valid_reads() {
    let err = run_clustering(
        records("r", REPRESENTATIVE, 5),
        &any_acgt(),
        &params(10, 100),
        &LevenshteinAligner::new(),
        &mut SequentialIdGenerator::new(),
    )
    .unwrap_err();

    assert!(matches!(
        pipeline_error(&err),
        PipelineError::NoClustersFound {
            min_coverage: 10,
            valid_records: 5
        }
    ));
}

#[test]
fn test_invalid_reads_never_found_clusters() {
    let mut input = records("bad", "ACGTNACGT", 20);
    input.extend(records("ok", "ACGTAACGT", 3));

    let err = run_clustering(
        input,
        &any_acgt(),
        &params(10, 100),
        &LevenshteinAligner::new(),
        &mut SequentialIdGenerator::new(),
    )
    .unwrap_err();
    assert!(matches!(
        pipeline_error(&err),
        PipelineError::NoClustersFound { valid_records: 3, .. }
    ));
}

#[test]
fn test_empty_input() {
    let aligner = LevenshteinAligner::new();
    let err = run_clustering(
        Vec::new(),
        &any_acgt(),
        &params(10, 100),
        &aligner,
        &mut SequentialIdGenerator::new(),
    )
    .unwrap_err();

    assert!(matches!(pipeline_error(&err), PipelineError::EmptyInput { .. }));
    assert!(aligner.submitted().is_empty());
}

#[test]
fn test_exact_cluster_with_near_duplicates_is_capped() {
    let mut input = records("exact", REPRESENTATIVE, 12);
    for n in 0..90 {
        input.push(SequenceRecord::new(
            format!("near{:02}", n),
            mutate(REPRESENTATIVE, &[n % 20]),
        ));
    }

    let aligner = LevenshteinAligner::new();
    let outcome = run_clustering(
        input,
        &any_acgt(),
        &params(10, 100),
        &aligner,
        &mut SequentialIdGenerator::new(),
    )
    .unwrap();

    assert_eq!(outcome.assignments.len(), 102);
    assert_eq!(aligner.submitted().len(), 90);

    let cluster_id = ClusterId::from_u128(1);
    let members = outcome.filtered.members(cluster_id);
    assert_eq!(members.len(), 100);
    let exact = members
        .iter()
        .filter(|a| a.source == AssignmentSource::Exact)
        .count();
    assert_eq!(exact, 12);
    // Equal distances fall back to read id order.
    assert_eq!(members.last().unwrap().read_id, "near87");
}

#[test]
fn test_cap_keeps_lowest_edit_distances() {
    let mut input = records("exact", REPRESENTATIVE, 10);
    for n in 0..150 {
        // Alternate arrival order between one and two mismatches.
        let positions: &[usize] = if n % 2 == 0 { &[3] } else { &[3, 11] };
        input.push(SequenceRecord::new(
            format!("near{:03}", n),
            mutate(REPRESENTATIVE, positions),
        ));
    }

    let outcome = run_clustering(
        input,
        &any_acgt(),
        &params(10, 100),
        &LevenshteinAligner::new(),
        &mut SequentialIdGenerator::new(),
    )
    .unwrap();

    let members = outcome.filtered.members(ClusterId::from_u128(1));
    assert_eq!(members.len(), 100);

    let count_at = |d: u32| members.iter().filter(|a| a.edit_distance == d).count();
    assert_eq!(count_at(0), 10);
    assert_eq!(count_at(1), 75);
    assert_eq!(count_at(2), 15);
    assert!(members
        .windows(2)
        .all(|w| w[0].edit_distance <= w[1].edit_distance));
}

#[test]
fn test_exact_matches_bypass_the_aligner() {
    let second = "TTGCATTGCATTGCATTGCA";
    let mut input = records("a", REPRESENTATIVE, 10);
    input.extend(records("b", second, 10));
    input.push(SequenceRecord::new("noisy", mutate(second, &[0])));
    input.push(SequenceRecord::new("far", "GGGGGGGGGGGGGGGGGGGG"));

    let aligner = LevenshteinAligner::new();
    let outcome = run_clustering(
        input,
        &any_acgt(),
        &params(10, 100),
        &aligner,
        &mut SequentialIdGenerator::new(),
    )
    .unwrap();

    assert_eq!(aligner.submitted(), vec!["noisy".to_string(), "far".to_string()]);
    assert_eq!(outcome.alignment.matched, 1);
    assert_eq!(outcome.alignment.unmatched, 1);

    // Clusters are founded in sequence order.
    assert_eq!(outcome.clusters.lookup_sequence(REPRESENTATIVE), Some(ClusterId::from_u128(1)));
    assert_eq!(outcome.clusters.lookup_sequence(second), Some(ClusterId::from_u128(2)));
    assert_eq!(outcome.filtered.cluster_of("noisy"), Some(ClusterId::from_u128(2)));
    assert_eq!(outcome.filtered.cluster_of("far"), None);
    assert_eq!(outcome.filtered.len(), 21);
}

#[test]
fn test_no_alignment_for_any_leftover_read() {
    let mut input = records("a", REPRESENTATIVE, 10);
    input.push(SequenceRecord::new("far1", "GGGGGGGGGGGGGGGGGGGG"));
    input.push(SequenceRecord::new("far2", "CCCCCCCCCCCCCCCCCCCC"));
    assert!(levenshtein("GGGGGGGGGGGGGGGGGGGG", REPRESENTATIVE) > 2);

    let err = run_clustering(
        input,
        &any_acgt(),
        &params(10, 100),
        &LevenshteinAligner::new(),
        &mut SequentialIdGenerator::new(),
    )
    .unwrap_err();
    assert!(matches!(
        pipeline_error(&err),
        PipelineError::NoAlignmentsFound {
            queries: 2,
            exact_matches: 10
        }
    ));
    assert!(err.to_string().contains("10 reads matched exactly"));
}

#[test]
fn test_filtered_clusters_stay_within_bounds() {
    let small = "TTGCATTGCATTGCATTGCA";
    let mut input = records("big", REPRESENTATIVE, 130);
    input.extend(records("small", small, 10));
    for n in 0..5 {
        input.push(SequenceRecord::new(format!("x{}", n), mutate(REPRESENTATIVE, &[n])));
    }

    let outcome = run_clustering(
        input,
        &any_acgt(),
        &params(10, 100),
        &LevenshteinAligner::new(),
        &mut SequentialIdGenerator::new(),
    )
    .unwrap();

    assert_eq!(outcome.filtered.cluster_count(), 2);
    for id in outcome.filtered.cluster_ids() {
        let n = outcome.filtered.members(id).len();
        assert!((10..=100).contains(&n), "cluster {} has {} members", id, n);
    }
    // The capped cluster keeps exact reads only.
    assert!(outcome
        .filtered
        .members(ClusterId::from_u128(1))
        .iter()
        .all(|a| a.edit_distance == 0));
}
