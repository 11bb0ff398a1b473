use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single `{identifier, sequence}` pair as read from a FASTA/FASTQ source.
///
/// `id` is the complete header line without the leading `>`/`@`, so that
/// whitespace and tags after the first token survive a write/read cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    /// Read name used as the assignment key: the first whitespace-delimited
    /// token of the header, which is also what aligners report as QNAME.
    pub fn read_name(&self) -> &str {
        read_name(&self.id)
    }
}

pub(crate) fn read_name(header: &str) -> &str {
    header.split_whitespace().next().unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRecord {
    pub record: SequenceRecord,
    pub is_valid: bool,
}

/// Cluster identifier, a 128-bit UUID rendered in the canonical
/// `8-4-4-4-12` hexadecimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(u128);

impl ClusterId {
    pub fn from_u128(value: u128) -> Self {
        ClusterId(value)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = format!("{:032x}", self.0);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid cluster id '{0}': expected a hyphenated UUID")]
pub struct ParseClusterIdError(String);

impl FromStr for ClusterId {
    type Err = ParseClusterIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups: Vec<&str> = s.split('-').collect();
        let lengths = [8, 4, 4, 4, 12];
        if groups.len() != lengths.len()
            || groups.iter().zip(lengths).any(|(g, len)| g.len() != len)
            || !groups
                .iter()
                .all(|g| g.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Err(ParseClusterIdError(s.to_string()));
        }

        u128::from_str_radix(&groups.concat(), 16)
            .map(ClusterId)
            .map_err(|_| ParseClusterIdError(s.to_string()))
    }
}

impl Serialize for ClusterId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub cluster_id: ClusterId,
    pub representative: String,
    /// Number of valid records carrying exactly `representative`.
    pub support: usize,
}

/// How an assignment was produced. Exact matches rank ahead of aligner hits
/// with the same edit distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssignmentSource {
    Exact,
    Approximate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub read_id: String,
    pub cluster_id: ClusterId,
    pub cigar: String,
    pub edit_distance: u32,
    pub source: AssignmentSource,
}

impl Assignment {
    pub fn exact(read_id: impl Into<String>, cluster_id: ClusterId, length: usize) -> Self {
        Self {
            read_id: read_id.into(),
            cluster_id,
            cigar: format!("{}M", length),
            edit_distance: 0,
            source: AssignmentSource::Exact,
        }
    }
}

/// Naming used in tables for the two workflows sharing the clustering core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Barcode,
    Flycode,
}

impl TagKind {
    pub fn sequence_column(&self) -> &'static str {
        match self {
            TagKind::Barcode => "barcode",
            TagKind::Flycode => "flycode",
        }
    }

    pub fn validity_column(&self) -> &'static str {
        match self {
            TagKind::Barcode => "is_valid_barcode",
            TagKind::Flycode => "is_valid_flycode",
        }
    }

    pub fn cluster_column(&self) -> &'static str {
        match self {
            TagKind::Barcode => "barcode_id",
            TagKind::Flycode => "cluster_id",
        }
    }
}
