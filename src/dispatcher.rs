//! # Dispatcher
//!
//! Orchestratore di una singola esecuzione di oxipng.
//!
//! ## Flusso:
//! 1. Costruisce gli argomenti (`--opt max --preserve --dir <dest>`, più
//!    `--recursive --threads <n>` in modalità directory)
//! 2. Logga il comando completo
//! 3. Esegue oxipng e aspetta la fine
//! 4. Successo: riporta il risultato, poi mantiene o rimuove gli originali
//! 5. Fallimento: riporta stderr, non tocca mai gli originali
//!
//! Il dispatcher non termina mai il processo: restituisce `Outcome` oppure
//! `CompressError`, e solo `main` li traduce in codice di uscita.

use crate::{
    args,
    error::CompressError,
    file_manager::FileManager,
    job::{Job, JobMode},
    progress::ProgressManager,
    runner::{OptimizerRunner, ProcessRunner},
    utils::format_command,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What happened to the original input after a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Kept,
    Removed { files: usize },
}

/// Successful result of a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Compressed { disposition: Disposition },
    DryRun { command: String },
}

/// Build the optimizer argument list for a job.
///
/// The layout is a fixed contract with existing scripts:
/// `--opt max --preserve --dir <destination> [--recursive --threads <n>] <source>`
pub fn build_args(job: &Job) -> Vec<String> {
    let mut cmd_args = args!["--opt", "max", "--preserve", "--dir", job.destination().display()];

    if job.is_directory() {
        cmd_args.extend(args!["--recursive", "--threads", job.threads()]);
    }

    cmd_args.push(job.source().display().to_string());
    cmd_args
}

/// Runs the optimizer for a job and handles the originals
pub struct Dispatcher<R = ProcessRunner> {
    optimizer: PathBuf,
    runner: R,
    show_progress: bool,
}

impl<R: OptimizerRunner> Dispatcher<R> {
    pub fn new(optimizer: PathBuf, runner: R) -> Self {
        Self {
            optimizer,
            runner,
            show_progress: false,
        }
    }

    /// Show a spinner while the optimizer runs
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn optimizer(&self) -> &Path {
        &self.optimizer
    }

    pub async fn dispatch(&self, job: &Job, dry_run: bool) -> Result<Outcome, CompressError> {
        let cmd_args = build_args(job);
        let command = format_command(&self.optimizer, &cmd_args);

        if job.mode() == JobMode::Directory {
            warn!(
                "\"{}\" is not a PNG file, treating as a directory...",
                job.source().display()
            );
        }
        info!("Running command: {}", command);

        if dry_run {
            info!("Dry run, optimizer not started");
            return Ok(Outcome::DryRun { command });
        }

        // Snapshot the originals before oxipng writes anything
        let originals = match job.mode() {
            JobMode::File => vec![job.source().to_path_buf()],
            JobMode::Directory => {
                let found = FileManager::find_pngs(job.source(), job.destination());
                info!("Found {} PNG files in {}", found.len(), job.source().display());
                found
            }
        };
        let original_size = match job.mode() {
            JobMode::File => FileManager::file_size(job.source()).await,
            JobMode::Directory => None,
        };

        tokio::fs::create_dir_all(job.destination()).await?;

        let progress = if self.show_progress {
            ProgressManager::spinner(format!("Compressing {}", job.source_name()))
        } else {
            ProgressManager::hidden()
        };
        let result = self.runner.run(&self.optimizer, &cmd_args).await;
        progress.finish();
        let result = result?;

        if !result.success() {
            error!("Command failed, stderr:");
            error!("{}", result.stderr_text());
            return Err(CompressError::OptimizerFailed {
                code: result.exit_code,
                stderr: result.stderr_text(),
            });
        }

        info!(
            "Successfully compressed \"{}\" to \"{}\"",
            job.source_name(),
            job.destination().display()
        );

        let stdout = result.stdout_text();
        if !stdout.is_empty() {
            info!("stdout: {}", stdout);
        }

        if let Some(original_size) = original_size {
            self.report_size(job, original_size).await;
        }

        if job.keep_original() {
            let location = match job.mode() {
                JobMode::File => job.source().parent().unwrap_or(job.source()),
                JobMode::Directory => job.source(),
            };
            info!("Keeping original file in \"{}\"", location.display());
            return Ok(Outcome::Compressed {
                disposition: Disposition::Kept,
            });
        }

        match job.mode() {
            JobMode::File => info!("Removing original file \"{}\"", job.source().display()),
            JobMode::Directory => info!(
                "Removing {} original files under \"{}\"",
                originals.len(),
                job.source().display()
            ),
        }
        let files = FileManager::remove_files(&originals).await?;
        debug!("Removed {} original files", files);

        Ok(Outcome::Compressed {
            disposition: Disposition::Removed { files },
        })
    }

    async fn report_size(&self, job: &Job, original_size: u64) {
        let Some(name) = job.source().file_name() else {
            return;
        };
        let compressed = job.destination().join(name);
        if let Some(new_size) = FileManager::file_size(&compressed).await {
            info!(
                "{} -> {} ({:.1}% saved)",
                FileManager::format_size(original_size),
                FileManager::format_size(new_size),
                FileManager::calculate_reduction(original_size, new_size)
            );
        }
    }
}
