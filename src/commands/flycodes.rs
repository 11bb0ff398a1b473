use super::{ensure_output_dir, AlignmentWorkspace};
use crate::aligner::{Aligner, BwaAligner};
use crate::clustering::{self, ClusteringParams, IdGenerator, RandomIdGenerator, ValidityPattern};
use crate::config::Config;
use crate::io::{read_fastx, read_records, tables, write_fastx};
use crate::types::TagKind;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FlycodeOptions {
    /// Flycodes extracted from the reads, named like the reads they came from.
    pub flycodes: PathBuf,
    /// Full reads to be binned by flycode cluster.
    pub sequences: PathBuf,
    pub output_dir: PathBuf,
}

pub fn run(options: FlycodeOptions, config: &Config) -> Result<()> {
    config.validate()?;
    let workspace = AlignmentWorkspace::create(config, &options.output_dir)?;
    let aligner = BwaAligner::locate(config.aligner.executable.as_deref(), workspace.path())?;
    log::debug!("Aligner working directory: {}", aligner.work_dir().display());

    run_with_aligner(options, config, &aligner, &mut RandomIdGenerator::new())
}

/// Flycode workflow: cluster flycodes with the fixed flycode pattern and bin
/// the full reads into `clusters/{cluster_id}.fastq.gz`.
pub fn run_with_aligner<A: Aligner>(
    options: FlycodeOptions,
    config: &Config,
    aligner: &A,
    ids: &mut dyn IdGenerator,
) -> Result<()> {
    config.validate()?;
    let pattern = ValidityPattern::flycode()?;
    log::debug!("Flycode validity pattern: {}", pattern.as_str());

    let records = read_records(&options.flycodes)?;
    log::info!("Read {} flycodes from {}", records.len(), options.flycodes.display());

    let params = ClusteringParams::from_config(config);
    let outcome = clustering::run_clustering(records, &pattern, &params, aligner, ids)?;
    outcome.log_summary();

    let reads = read_fastx(&options.sequences)?;
    let total_reads = reads.len();
    let bins = clustering::materialize::bin_reads(&outcome.filtered, reads);
    log::info!(
        "Binned {} of {} reads into {} clusters",
        bins.values().map(Vec::len).sum::<usize>(),
        total_reads,
        bins.len()
    );

    let out = |name: &str| options.output_dir.join(name);
    ensure_output_dir(&options.output_dir)?;
    tables::write_classified_reads(&out("flycodes.csv"), TagKind::Flycode, &outcome.classified)?;
    tables::write_clusters(&out("clusters.csv"), TagKind::Flycode, outcome.clusters.clusters())?;
    tables::write_assignments(&out("mapped_flycodes.csv"), TagKind::Flycode, &outcome.assignments)?;
    tables::write_assignments(
        &out("mapped_flycodes_filtered.csv"),
        TagKind::Flycode,
        outcome.filtered.iter(),
    )?;

    let bin_dir = out("clusters");
    fs::create_dir_all(&bin_dir)
        .with_context(|| format!("Failed to create {}", bin_dir.display()))?;
    for (cluster_id, reads) in &bins {
        let extension = if reads.iter().all(|r| r.quality.is_some()) {
            "fastq.gz"
        } else {
            "fasta.gz"
        };
        write_fastx(&bin_dir.join(format!("{}.{}", cluster_id, extension)), reads)?;
    }

    Ok(())
}
