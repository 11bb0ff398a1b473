//! Approximate aligner boundary.
//!
//! The clustering core only consumes structured outcomes; how a hit is found
//! is up to the implementation. [`BwaAligner`] drives `bwa aln`/`samse`, and
//! tests substitute deterministic stubs.

pub mod bwa;
pub mod sam;

pub use bwa::BwaAligner;

use crate::types::SequenceRecord;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignParams {
    pub max_edit_distance: u32,
    pub threads: usize,
}

/// Best placement of one query on one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentHit {
    pub query_id: String,
    pub reference_id: String,
    pub edit_distance: u32,
    pub cigar: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentOutcome {
    Mapped(AlignmentHit),
    Unmapped { query_id: String },
}

impl AlignmentOutcome {
    pub fn query_id(&self) -> &str {
        match self {
            AlignmentOutcome::Mapped(hit) => &hit.query_id,
            AlignmentOutcome::Unmapped { query_id } => query_id,
        }
    }
}

/// An external approximate matcher: index a reference set once, then place
/// a batch of queries against it, returning at most one best match each.
///
/// Calls are synchronous; any internal parallelism is the implementation's
/// business and is steered only by [`AlignParams::threads`].
pub trait Aligner {
    type Index;

    fn index(&self, references: &[SequenceRecord]) -> Result<Self::Index>;

    fn align(
        &self,
        queries: &[SequenceRecord],
        index: &Self::Index,
        params: &AlignParams,
    ) -> Result<Vec<AlignmentOutcome>>;
}
