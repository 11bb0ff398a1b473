use crate::error::PipelineError;
use crate::types::{ClassifiedRecord, Cluster, ClusterId, SequenceRecord};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};

/// Source of fresh cluster identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> ClusterId;
}

/// Random version-4 UUIDs. Seed it for reproducible ids.
pub struct RandomIdGenerator {
    rng: StdRng,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

const VERSION_MASK: u128 = 0xF << 76;
const VERSION_4: u128 = 0x4 << 76;
const VARIANT_MASK: u128 = 0b11 << 62;
const VARIANT_RFC4122: u128 = 0b10 << 62;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> ClusterId {
        let bits: u128 = self.rng.gen();
        ClusterId::from_u128((bits & !VERSION_MASK & !VARIANT_MASK) | VERSION_4 | VARIANT_RFC4122)
    }
}

/// Ids `1, 2, 3, ...`; handy when runs must be compared byte for byte.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: u128,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> ClusterId {
        let id = ClusterId::from_u128(self.next);
        self.next += 1;
        id
    }
}

/// Clusters founded by representative selection, ordered by representative
/// sequence, with a sequence → id index for exact-match lookups.
#[derive(Debug, Clone)]
pub struct ClusterTable {
    clusters: Vec<Cluster>,
    by_sequence: HashMap<String, ClusterId>,
}

impl ClusterTable {
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn lookup_sequence(&self, sequence: &str) -> Option<ClusterId> {
        self.by_sequence.get(sequence).copied()
    }

    pub fn contains(&self, cluster_id: ClusterId) -> bool {
        self.clusters.iter().any(|c| c.cluster_id == cluster_id)
    }

    /// Representatives as reference records named by cluster id, the form
    /// handed to the aligner.
    pub fn reference_records(&self) -> Vec<SequenceRecord> {
        self.clusters
            .iter()
            .map(|c| SequenceRecord::new(c.cluster_id.to_string(), c.representative.clone()))
            .collect()
    }
}

/// Promote every valid sequence seen at least `min_coverage` times to a
/// cluster representative.
pub fn select_representatives(
    records: &[ClassifiedRecord],
    min_coverage: usize,
    ids: &mut dyn IdGenerator,
) -> Result<ClusterTable> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut valid_records = 0;
    for classified in records.iter().filter(|c| c.is_valid) {
        valid_records += 1;
        *counts.entry(classified.record.sequence.as_str()).or_insert(0) += 1;
    }

    let mut clusters = Vec::new();
    let mut by_sequence = HashMap::new();
    for (sequence, support) in counts {
        if support < min_coverage {
            continue;
        }
        let cluster_id = ids.next_id();
        by_sequence.insert(sequence.to_string(), cluster_id);
        clusters.push(Cluster {
            cluster_id,
            representative: sequence.to_string(),
            support,
        });
    }

    if clusters.is_empty() {
        return Err(PipelineError::NoClustersFound {
            min_coverage,
            valid_records,
        }
        .into());
    }

    log::info!(
        "Selected {} representatives from {} valid of {} records (min coverage {})",
        clusters.len(),
        valid_records,
        records.len(),
        min_coverage
    );

    Ok(ClusterTable {
        clusters,
        by_sequence,
    })
}
