use crate::config::Config;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (defaults to the per-user config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster extracted barcodes and write one reference per barcode cluster
    Barcodes {
        /// Sample name used as prefix for every output file
        #[arg(long)]
        sample_id: String,
        /// FASTA file whose first record is the reference payload
        #[arg(long)]
        reference_seq: PathBuf,
        /// FASTA/FASTQ file of extracted barcodes (optionally gzipped)
        #[arg(long)]
        barcodes: PathBuf,
        /// Regular expression searched in each barcode; anchor with ^...$ to require a full match
        #[arg(long)]
        barcode_regex: String,
        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        clustering: ClusteringArgs,
    },

    /// Cluster flycodes and bin the full reads by flycode cluster
    Flycodes {
        /// FASTA/FASTQ file of extracted flycodes (optionally gzipped)
        #[arg(long)]
        flycodes: PathBuf,
        /// FASTA/FASTQ file of the full reads the flycodes came from
        #[arg(long)]
        sequences: PathBuf,
        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        clustering: ClusteringArgs,
    },
}

/// Command line overrides for the configuration file.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct ClusteringArgs {
    /// Minimum support to found a cluster and to keep it after filtering
    #[arg(long, alias = "barcode-min-coverage")]
    pub min_coverage: Option<usize>,
    /// Maximum reads retained per cluster
    #[arg(long)]
    pub max_reads_per_cluster: Option<usize>,
    /// Maximum edit distance accepted from the aligner
    #[arg(long)]
    pub max_edit_distance: Option<u32>,
    /// Aligner threads
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
    /// Path to the bwa executable
    #[arg(long)]
    pub bwa: Option<PathBuf>,
    /// Keep aligner index and reports under <output_dir>/alignment
    #[arg(long)]
    pub keep_intermediate: bool,
}

impl ClusteringArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(min_coverage) = self.min_coverage {
            config.clustering.min_coverage = min_coverage;
        }
        if let Some(max_reads) = self.max_reads_per_cluster {
            config.clustering.max_reads_per_cluster = max_reads;
        }
        if let Some(distance) = self.max_edit_distance {
            config.aligner.max_edit_distance = distance;
        }
        if let Some(threads) = self.threads {
            config.aligner.threads = threads;
        }
        if let Some(bwa) = &self.bwa {
            config.aligner.executable = Some(bwa.clone());
        }
        if self.keep_intermediate {
            config.aligner.keep_intermediate = true;
        }
    }
}
