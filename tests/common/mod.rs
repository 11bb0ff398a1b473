#![allow(dead_code)]

use anyhow::Result;
use std::cell::RefCell;
use tagbin::aligner::{AlignParams, Aligner, AlignmentHit, AlignmentOutcome};
use tagbin::types::SequenceRecord;

/// Deterministic stand-in for bwa: plain Levenshtein distance against every
/// reference, best (then first) reference within the allowed distance wins.
#[derive(Default)]
pub struct LevenshteinAligner {
    pub submitted: RefCell<Vec<String>>,
}

impl LevenshteinAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.borrow().clone()
    }
}

impl Aligner for LevenshteinAligner {
    type Index = Vec<SequenceRecord>;

    fn index(&self, references: &[SequenceRecord]) -> Result<Self::Index> {
        Ok(references.to_vec())
    }

    fn align(
        &self,
        queries: &[SequenceRecord],
        index: &Self::Index,
        params: &AlignParams,
    ) -> Result<Vec<AlignmentOutcome>> {
        let mut outcomes = Vec::with_capacity(queries.len());
        for query in queries {
            self.submitted
                .borrow_mut()
                .push(query.read_name().to_string());

            let best = index
                .iter()
                .map(|reference| (levenshtein(&query.sequence, &reference.sequence), reference))
                .filter(|(distance, _)| *distance <= params.max_edit_distance)
                .min_by_key(|(distance, _)| *distance);

            outcomes.push(match best {
                Some((edit_distance, reference)) => AlignmentOutcome::Mapped(AlignmentHit {
                    query_id: query.read_name().to_string(),
                    reference_id: reference.id.clone(),
                    edit_distance,
                    cigar: format!("{}M", query.sequence.len()),
                }),
                None => AlignmentOutcome::Unmapped {
                    query_id: query.read_name().to_string(),
                },
            });
        }
        Ok(outcomes)
    }
}

pub fn levenshtein(a: &str, b: &str) -> u32 {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<u32> = (0..=b.len() as u32).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i as u32 + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + u32::from(ca != *cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current.push(substitution.min(insertion).min(deletion));
        }
        previous = current;
    }
    previous[b.len()]
}

/// `count` records named `{prefix}{n}` carrying the same sequence.
pub fn records(prefix: &str, sequence: &str, count: usize) -> Vec<SequenceRecord> {
    (0..count)
        .map(|n| SequenceRecord::new(format!("{}{}", prefix, n), sequence))
        .collect()
}

/// Replace the base at each position with a different one.
pub fn mutate(sequence: &str, positions: &[usize]) -> String {
    sequence
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if positions.contains(&i) {
                if c == 'A' {
                    'C'
                } else {
                    'A'
                }
            } else {
                c
            }
        })
        .collect()
}
