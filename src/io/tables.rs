//! Comma-delimited tables written for downstream tooling and inspection.
//!
//! Column names depend on the workflow ([`TagKind`]) but the order of columns
//! is fixed: identifiers first, evidence last.

use crate::types::{Assignment, ClassifiedRecord, Cluster, TagKind};
use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;

fn open_table(path: &Path, header: &[&str]) -> Result<Writer<File>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create table {}", path.display()))?;
    writer.write_record(header)?;
    Ok(writer)
}

/// `read_id, <tag>, is_valid_<tag>` for every ingested record.
pub fn write_classified_reads(path: &Path, kind: TagKind, records: &[ClassifiedRecord]) -> Result<()> {
    let mut writer = open_table(
        path,
        &["read_id", kind.sequence_column(), kind.validity_column()],
    )?;
    for classified in records {
        writer.serialize((
            &classified.record.id,
            &classified.record.sequence,
            classified.is_valid,
        ))?;
    }
    writer.flush()?;
    Ok(())
}

/// `<cluster>, <tag>` for every cluster founded by representative selection.
pub fn write_clusters(path: &Path, kind: TagKind, clusters: &[Cluster]) -> Result<()> {
    let mut writer = open_table(path, &[kind.cluster_column(), kind.sequence_column()])?;
    for cluster in clusters {
        writer.serialize((cluster.cluster_id, &cluster.representative))?;
    }
    writer.flush()?;
    Ok(())
}

/// `read_id, <cluster>, cigar, edit_distance`, used for both the raw and the
/// filtered assignment sets.
pub fn write_assignments<'a, I>(path: &Path, kind: TagKind, assignments: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut writer = open_table(
        path,
        &["read_id", kind.cluster_column(), "cigar", "edit_distance"],
    )?;
    for assignment in assignments {
        writer.serialize((
            &assignment.read_id,
            assignment.cluster_id,
            &assignment.cigar,
            assignment.edit_distance,
        ))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClusterId, SequenceRecord};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_classified_reads_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reads.csv");
        let records = vec![
            ClassifiedRecord {
                record: SequenceRecord::new("r1", "ACGT"),
                is_valid: true,
            },
            ClassifiedRecord {
                record: SequenceRecord::new("r2 extra", "AC"),
                is_valid: false,
            },
        ];

        write_classified_reads(&path, TagKind::Barcode, &records).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "read_id,barcode,is_valid_barcode\nr1,ACGT,true\nr2 extra,AC,false\n"
        );
    }

    #[test]
    fn test_cluster_and_assignment_tables() {
        let dir = tempdir().unwrap();
        let id = ClusterId::from_u128(42);
        let clusters = vec![Cluster {
            cluster_id: id,
            representative: "GGTAGT".to_string(),
            support: 12,
        }];

        let clusters_path = dir.path().join("clusters.csv");
        write_clusters(&clusters_path, TagKind::Flycode, &clusters).unwrap();
        assert_eq!(
            fs::read_to_string(&clusters_path).unwrap(),
            format!("cluster_id,flycode\n{},GGTAGT\n", id)
        );

        let assignments = vec![Assignment::exact("r1", id, 6)];
        let mapped_path = dir.path().join("mapped.csv");
        write_assignments(&mapped_path, TagKind::Flycode, &assignments).unwrap();
        assert_eq!(
            fs::read_to_string(&mapped_path).unwrap(),
            format!("read_id,cluster_id,cigar,edit_distance\nr1,{},6M,0\n", id)
        );
    }
}
