use crate::types::{ClassifiedRecord, SequenceRecord};
use anyhow::{Context, Result};
use regex::Regex;

/// Structure of a valid flycode: a `GGTAGT` start, six to eight codons from a
/// restricted set, and one of four C-terminal linkers.
pub const FLYCODE_PATTERN: &str = "^GGTAGT(GCA|GTT|GAT|CCA|GAA|ACT|GGT|TCT|TAC|CTG|TGG|CAG|TTC|AAC){6,8}(TGGCGG|TGGCTGCGG|TGGCAGTCTCGG|TGGCAGGAAGGAGGTCGG)$";

/// Shape a tag must have to be considered for founding a cluster. Matching is
/// a search anywhere in the sequence; anchor the pattern to require a full
/// match.
#[derive(Debug, Clone)]
pub struct ValidityPattern {
    regex: Regex,
}

impl ValidityPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("Invalid validity pattern '{}'", pattern))?;
        Ok(Self { regex })
    }

    pub fn flycode() -> Result<Self> {
        Self::new(FLYCODE_PATTERN)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_valid(&self, sequence: &str) -> bool {
        self.regex.is_match(sequence)
    }
}

pub fn classify(records: Vec<SequenceRecord>, pattern: &ValidityPattern) -> Vec<ClassifiedRecord> {
    records
        .into_iter()
        .map(|record| {
            let is_valid = pattern.is_valid(&record.sequence);
            ClassifiedRecord { record, is_valid }
        })
        .collect()
}
