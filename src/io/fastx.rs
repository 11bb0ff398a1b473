//! FASTA/FASTQ source and sink.
//!
//! Records are read with needletail, which hands back the whole header line
//! as the identifier, and written with bio's writers through niffler so that
//! a `.gz` suffix produces gzip output.

use crate::error::PipelineError;
use crate::types::SequenceRecord;
use anyhow::{anyhow, Context, Result};
use bio::io::{fasta, fastq};
use needletail::errors::ParseErrorKind;
use needletail::parse_fastx_file;
use std::io::Write;
use std::path::Path;

/// A raw read as found in the input, qualities included when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastxRecord {
    pub id: String,
    pub sequence: Vec<u8>,
    pub quality: Option<Vec<u8>>,
}

impl FastxRecord {
    pub fn read_name(&self) -> &str {
        crate::types::read_name(&self.id)
    }
}

impl From<FastxRecord> for SequenceRecord {
    fn from(record: FastxRecord) -> Self {
        SequenceRecord {
            id: record.id,
            sequence: String::from_utf8_lossy(&record.sequence).into_owned(),
        }
    }
}

/// Read every record of a FASTA/FASTQ file (optionally compressed).
///
/// An empty file is an `EmptyInput` error: nothing downstream can run
/// without at least one candidate sequence.
pub fn read_fastx(path: &Path) -> Result<Vec<FastxRecord>> {
    let mut reader = match parse_fastx_file(path) {
        Ok(reader) => reader,
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => {
            return Err(PipelineError::empty_input(path.display().to_string()).into())
        }
        Err(e) => {
            return Err(anyhow!(
                "Failed to open sequence file {}: {}",
                path.display(),
                e
            ))
        }
    };

    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let record =
            record.map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;
        records.push(FastxRecord {
            id: String::from_utf8_lossy(record.id()).into_owned(),
            sequence: record.seq().to_vec(),
            quality: record.qual().map(|q| q.to_vec()),
        });
    }

    if records.is_empty() {
        return Err(PipelineError::empty_input(path.display().to_string()).into());
    }

    log::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Sequence Ingestor: load `{id, sequence}` pairs in file order.
pub fn read_records(path: &Path) -> Result<Vec<SequenceRecord>> {
    Ok(read_fastx(path)?
        .into_iter()
        .map(SequenceRecord::from)
        .collect())
}

/// The first record of a file, used for single-sequence reference payloads.
pub fn read_first_record(path: &Path) -> Result<SequenceRecord> {
    read_records(path)?
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::empty_input(path.display().to_string()).into())
}

fn create_writer(path: &Path) -> Result<Box<dyn Write>> {
    let format = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => niffler::compression::Format::Gzip,
        _ => niffler::compression::Format::No,
    };
    niffler::to_path(path, format, niffler::Level::Six)
        .with_context(|| format!("Failed to create {}", path.display()))
}

pub fn write_fasta(path: &Path, records: &[SequenceRecord]) -> Result<()> {
    let mut writer = fasta::Writer::new(create_writer(path)?);
    for record in records {
        writer
            .write(&record.id, None, record.sequence.as_bytes())
            .with_context(|| format!("Failed to write record to {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write raw reads, as FASTQ when every read carries qualities and as FASTA
/// otherwise.
pub fn write_fastx(path: &Path, records: &[FastxRecord]) -> Result<()> {
    let sink = create_writer(path)?;
    if !records.is_empty() && records.iter().all(|r| r.quality.is_some()) {
        let mut writer = fastq::Writer::new(sink);
        for record in records {
            let quality = record.quality.as_deref().unwrap_or_default();
            writer
                .write(&record.id, None, &record.sequence, quality)
                .with_context(|| format!("Failed to write record to {}", path.display()))?;
        }
        writer.flush()?;
    } else {
        let mut writer = fasta::Writer::new(sink);
        for record in records {
            writer
                .write(&record.id, None, &record.sequence)
                .with_context(|| format!("Failed to write record to {}", path.display()))?;
        }
        writer.flush()?;
    }
    Ok(())
}
