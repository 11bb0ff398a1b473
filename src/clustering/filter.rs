use crate::types::{Assignment, ClusterId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    pub min_coverage: usize,
    pub max_per_cluster: usize,
}

/// Assignments that survived ranking, capping and the coverage re-check,
/// grouped per cluster in rank order.
#[derive(Debug, Clone, Default)]
pub struct FilteredAssignments {
    by_cluster: BTreeMap<ClusterId, Vec<Assignment>>,
    read_to_cluster: HashMap<String, ClusterId>,
    dropped_clusters: usize,
}

impl FilteredAssignments {
    pub fn cluster_ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.by_cluster.keys().copied()
    }

    pub fn members(&self, cluster_id: ClusterId) -> &[Assignment] {
        self.by_cluster
            .get(&cluster_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.by_cluster.values().flatten()
    }

    pub fn cluster_of(&self, read_id: &str) -> Option<ClusterId> {
        self.read_to_cluster.get(read_id).copied()
    }

    pub fn cluster_count(&self) -> usize {
        self.by_cluster.len()
    }

    /// Clusters that had assignments but fell below the coverage threshold.
    pub fn dropped_clusters(&self) -> usize {
        self.dropped_clusters
    }

    pub fn len(&self) -> usize {
        self.read_to_cluster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cluster.is_empty()
    }
}

/// Best evidence first: lower edit distance, then exact before aligned, then
/// read id.
fn rank(a: &Assignment, b: &Assignment) -> Ordering {
    a.edit_distance
        .cmp(&b.edit_distance)
        .then(a.source.cmp(&b.source))
        .then_with(|| a.read_id.cmp(&b.read_id))
}

/// Keep at most `max_per_cluster` best-ranked reads per cluster and drop
/// clusters left with fewer than `min_coverage` reads.
///
/// A read listed more than once keeps only its best-ranked assignment.
pub fn filter_by_coverage(assignments: &[Assignment], params: FilterParams) -> FilteredAssignments {
    let mut ranked: Vec<&Assignment> = assignments.iter().collect();
    ranked.sort_by(|a, b| rank(a, b));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut grouped: BTreeMap<ClusterId, Vec<Assignment>> = BTreeMap::new();
    for assignment in ranked {
        if !seen.insert(assignment.read_id.as_str()) {
            continue;
        }
        let members = grouped.entry(assignment.cluster_id).or_default();
        if members.len() < params.max_per_cluster {
            members.push(assignment.clone());
        }
    }

    let before = grouped.len();
    grouped.retain(|cluster_id, members| {
        let keep = members.len() >= params.min_coverage;
        if !keep {
            log::debug!(
                "Dropping cluster {} with {} retained reads",
                cluster_id,
                members.len()
            );
        }
        keep
    });

    let read_to_cluster = grouped
        .iter()
        .flat_map(|(id, members)| members.iter().map(move |a| (a.read_id.clone(), *id)))
        .collect();

    let filtered = FilteredAssignments {
        dropped_clusters: before - grouped.len(),
        by_cluster: grouped,
        read_to_cluster,
    };
    log::info!(
        "{} clusters with {} reads survive filtering ({} dropped below coverage {})",
        filtered.cluster_count(),
        filtered.len(),
        filtered.dropped_clusters(),
        params.min_coverage
    );
    filtered
}
