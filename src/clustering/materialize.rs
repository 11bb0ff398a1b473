use super::filter::FilteredAssignments;
use crate::io::FastxRecord;
use crate::types::{ClusterId, SequenceRecord};
use std::collections::BTreeMap;

/// Barcode workflow: one reference per surviving cluster, named by cluster
/// id and carrying the shared payload sequence.
pub fn reference_records(filtered: &FilteredAssignments, payload: &str) -> Vec<SequenceRecord> {
    filtered
        .cluster_ids()
        .map(|id| SequenceRecord::new(id.to_string(), payload))
        .collect()
}

/// Flycode workflow: bin raw reads by the cluster their read name was
/// assigned to. Unassigned reads and reads of dropped clusters are left out.
pub fn bin_reads(
    filtered: &FilteredAssignments,
    reads: impl IntoIterator<Item = FastxRecord>,
) -> BTreeMap<ClusterId, Vec<FastxRecord>> {
    let mut bins: BTreeMap<ClusterId, Vec<FastxRecord>> = BTreeMap::new();
    for read in reads {
        if let Some(cluster_id) = filtered.cluster_of(read.read_name()) {
            bins.entry(cluster_id).or_default().push(read);
        }
    }
    bins
}
