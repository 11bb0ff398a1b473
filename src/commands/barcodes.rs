use super::{ensure_output_dir, AlignmentWorkspace};
use crate::aligner::{Aligner, BwaAligner};
use crate::clustering::{self, ClusteringParams, IdGenerator, RandomIdGenerator, ValidityPattern};
use crate::config::Config;
use crate::io::{read_first_record, read_records, tables, write_fasta};
use crate::types::TagKind;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BarcodeOptions {
    pub sample_id: String,
    /// FASTA whose first record is the payload written for every cluster.
    pub reference_seq: PathBuf,
    /// Extracted barcodes, one record per read.
    pub barcodes: PathBuf,
    pub barcode_regex: String,
    pub output_dir: PathBuf,
}

pub fn run(options: BarcodeOptions, config: &Config) -> Result<()> {
    config.validate()?;
    let workspace = AlignmentWorkspace::create(config, &options.output_dir)?;
    let aligner = BwaAligner::locate(config.aligner.executable.as_deref(), workspace.path())?;
    log::debug!("Aligner working directory: {}", aligner.work_dir().display());

    run_with_aligner(options, config, &aligner, &mut RandomIdGenerator::new())
}

/// Barcode workflow: cluster the extracted barcodes and write one reference
/// per surviving cluster, plus the read, cluster and assignment tables.
pub fn run_with_aligner<A: Aligner>(
    options: BarcodeOptions,
    config: &Config,
    aligner: &A,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    config.validate()?;
    let pattern = ValidityPattern::new(&options.barcode_regex)?;
    log::debug!("Barcode validity pattern: {}", pattern.as_str());
    let payload = read_first_record(&options.reference_seq)?;
    log::info!(
        "Using '{}' ({} bp) as reference payload",
        payload.id,
        payload.sequence.len()
    );

    let records = read_records(&options.barcodes)?;
    log::info!("Read {} barcodes from {}", records.len(), options.barcodes.display());

    let params = ClusteringParams::from_config(config);
    let outcome = clustering::run_clustering(records, &pattern, &params, aligner, ids)?;
    outcome.log_summary();

    let references = clustering::materialize::reference_records(&outcome.filtered, &payload.sequence);

    let out = |suffix: &str| options.output_dir.join(format!("{}_{}", options.sample_id, suffix));
    ensure_output_dir(&options.output_dir)?;
    tables::write_classified_reads(&out("reads.csv"), TagKind::Barcode, &outcome.classified)?;
    tables::write_clusters(&out("hq_barcodes.csv"), TagKind::Barcode, outcome.clusters.clusters())?;
    tables::write_assignments(&out("mapped_reads.csv"), TagKind::Barcode, &outcome.assignments)?;
    tables::write_assignments(
        &out("mapped_reads_filtered.csv"),
        TagKind::Barcode,
        outcome.filtered.iter(),
    )?;
    write_fasta(&out("references.fasta"), &references)?;

    log::info!(
        "Wrote {} cluster references to {}",
        references.len(),
        out("references.fasta").display()
    );
    Ok(())
}
