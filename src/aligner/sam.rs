use super::{AlignmentHit, AlignmentOutcome};
use anyhow::{Context, Result};
use rust_htslib::bam::{self, record::Aux, Read};
use std::path::Path;

/// Parse an aligner report in SAM format into one outcome per primary record.
///
/// A record counts as a match only when the unmapped flag is clear, the
/// reference is named and an `NM` tag supplies the edit distance.
/// Secondary and supplementary lines are skipped.
pub fn read_alignment_report(path: &Path) -> Result<Vec<AlignmentOutcome>> {
    let mut reader = bam::Reader::from_path(path)
        .with_context(|| format!("Failed to open alignment report {}", path.display()))?;
    let header = reader.header().clone();

    let mut outcomes = Vec::new();
    for result in reader.records() {
        let record = result
            .with_context(|| format!("Failed to read record from {}", path.display()))?;
        if record.is_secondary() || record.is_supplementary() {
            continue;
        }

        let query_id = String::from_utf8_lossy(record.qname()).into_owned();
        if record.is_unmapped() || record.tid() < 0 {
            outcomes.push(AlignmentOutcome::Unmapped { query_id });
            continue;
        }

        let Some(edit_distance) = edit_distance(&record) else {
            log::debug!("Alignment of {} carries no usable NM tag; treating as unmapped", query_id);
            outcomes.push(AlignmentOutcome::Unmapped { query_id });
            continue;
        };

        let reference_id = String::from_utf8_lossy(header.tid2name(record.tid() as u32)).into_owned();
        outcomes.push(AlignmentOutcome::Mapped(AlignmentHit {
            query_id,
            reference_id,
            edit_distance,
            cigar: record.cigar().to_string(),
        }));
    }

    Ok(outcomes)
}

fn edit_distance(record: &bam::Record) -> Option<u32> {
    match record.aux(b"NM").ok()? {
        Aux::U8(v) => Some(v as u32),
        Aux::U16(v) => Some(v as u32),
        Aux::U32(v) => Some(v),
        Aux::I8(v) => u32::try_from(v).ok(),
        Aux::I16(v) => u32::try_from(v).ok(),
        Aux::I32(v) => u32::try_from(v).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const REFERENCE: &str = "00000000-0000-0000-0000-000000000001";

    #[test]
    fn test_report_parsing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.sam");
        let sam = format!(
            "@HD\tVN:1.6\tSO:unsorted\n\
             @SQ\tSN:{reference}\tLN:8\n\
             r1\t0\t{reference}\t1\t37\t8M\t*\t0\t0\tACGTACGA\t*\tXT:A:U\tNM:i:1\tX0:i:1\n\
             r2\t4\t*\t0\t0\t*\t*\t0\t0\tTTTTTTTT\t*\n\
             r3\t16\t{reference}\t1\t25\t7M1I\t*\t0\t0\tACGTACGG\t*\tNM:i:2\n\
             r4\t0\t{reference}\t1\t25\t8M\t*\t0\t0\tACGTACGT\t*\n",
            reference = REFERENCE
        );
        fs::write(&path, sam).unwrap();

        let outcomes = read_alignment_report(&path).unwrap();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes[0],
            AlignmentOutcome::Mapped(AlignmentHit {
                query_id: "r1".to_string(),
                reference_id: REFERENCE.to_string(),
                edit_distance: 1,
                cigar: "8M".to_string(),
            })
        );
        assert_eq!(
            outcomes[1],
            AlignmentOutcome::Unmapped {
                query_id: "r2".to_string()
            }
        );
        match &outcomes[2] {
            AlignmentOutcome::Mapped(hit) => {
                assert_eq!(hit.edit_distance, 2);
                assert_eq!(hit.cigar, "7M1I");
            }
            other => panic!("expected a mapped record, got {:?}", other),
        }
        // Mapped but without NM: no usable evidence.
        assert_eq!(outcomes[3].query_id(), "r4");
        assert!(matches!(outcomes[3], AlignmentOutcome::Unmapped { .. }));
    }
}
