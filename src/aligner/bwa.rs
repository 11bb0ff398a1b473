use super::sam::read_alignment_report;
use super::{AlignParams, Aligner, AlignmentOutcome};
use crate::io::write_fasta;
use crate::types::SequenceRecord;
use crate::utils::external_tools::check_bwa;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Drives the `bwa` backtrack aligner: `bwa index`, then `bwa aln` and
/// `bwa samse` for every query batch. All files live in `work_dir`.
pub struct BwaAligner {
    executable: PathBuf,
    work_dir: PathBuf,
}

#[derive(Debug)]
pub struct BwaIndex {
    reference_fasta: PathBuf,
}

impl BwaAligner {
    pub fn new(executable: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Resolve the executable (configured path or PATH lookup) and make sure
    /// it can be started.
    pub fn locate(configured: Option<&Path>, work_dir: impl Into<PathBuf>) -> Result<Self> {
        let executable = check_bwa(configured)?;
        Ok(Self::new(executable, work_dir))
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn run(&self, args: Vec<OsString>, stdout: Option<&Path>) -> Result<()> {
        let mut command = Command::new(&self.executable);
        command.args(&args).stderr(Stdio::piped());

        match stdout {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                command.stdout(Stdio::from(file));
            }
            None => {
                command.stdout(Stdio::null());
            }
        }

        log::debug!(
            "Running '{} {}'",
            self.executable.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = command
            .output()
            .with_context(|| format!("Failed to run {}", self.executable.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "bwa {} failed: {}",
                args.first().map(|a| a.to_string_lossy()).unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(())
    }
}

impl Aligner for BwaAligner {
    type Index = BwaIndex;

    fn index(&self, references: &[SequenceRecord]) -> Result<BwaIndex> {
        let reference_fasta = self.work_dir.join("references.fasta");
        write_fasta(&reference_fasta, references)?;

        self.run(
            vec!["index".into(), reference_fasta.clone().into()],
            None,
        )
        .context("Failed to index cluster representatives")?;

        Ok(BwaIndex { reference_fasta })
    }

    fn align(
        &self,
        queries: &[SequenceRecord],
        index: &BwaIndex,
        params: &AlignParams,
    ) -> Result<Vec<AlignmentOutcome>> {
        let progress = ProgressBarBuilder::new(format!(
            "Aligning {} sequences to cluster representatives...",
            queries.len()
        ))
        .with_tick()
        .build()?;

        let query_fasta = self.work_dir.join("queries.fasta");
        let sai = self.work_dir.join("queries.sai");
        let report = self.work_dir.join("queries.sam");
        write_fasta(&query_fasta, queries)?;

        self.run(
            vec![
                "aln".into(),
                "-t".into(),
                params.threads.to_string().into(),
                "-N".into(),
                "-n".into(),
                params.max_edit_distance.to_string().into(),
                index.reference_fasta.clone().into(),
                query_fasta.clone().into(),
            ],
            Some(&sai),
        )?;

        self.run(
            vec![
                "samse".into(),
                index.reference_fasta.clone().into(),
                sai.into(),
                query_fasta.into(),
            ],
            Some(&report),
        )?;

        let outcomes = read_alignment_report(&report)?;
        progress.finish_with_message(format!("Aligned {} sequences", queries.len()));
        Ok(outcomes)
    }
}
