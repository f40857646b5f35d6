//! # Job Module
//!
//! A `Job` is one invocation's resolved work item: absolute source and
//! destination, file or directory mode, thread count and keep flag.
//! Paths are made absolute and lexically normalized here, so nothing
//! relative reaches the optimizer command line.

use crate::config::Config;
use crate::error::CompressError;
use crate::file_manager::FileManager;
use std::path::{Component, Path, PathBuf};

/// How the optimizer is asked to treat the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    /// A single `.png` file
    File,
    /// Anything else, walked recursively by the optimizer
    Directory,
}

impl JobMode {
    /// Mode implied by a source path: `.png` means a single file
    pub fn detect(source: &Path) -> Self {
        if FileManager::is_png(source) {
            Self::File
        } else {
            Self::Directory
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    source: PathBuf,
    destination: PathBuf,
    mode: JobMode,
    threads: usize,
    keep_original: bool,
}

impl Job {
    pub fn new(
        source: &Path,
        destination: &Path,
        threads: usize,
        keep_original: bool,
    ) -> Result<Self, CompressError> {
        if threads == 0 {
            return Err(CompressError::Config(
                "Number of threads must be greater than 0".to_string(),
            ));
        }

        let source = absolute(source)?;
        let destination = absolute(destination)?;
        for path in [&source, &destination] {
            if path.to_str().is_none() {
                return Err(CompressError::Config(format!(
                    "Path is not valid UTF-8: {}",
                    path.display()
                )));
            }
        }
        let mode = JobMode::detect(&source);

        // Writing into the source's own directory would replace the original,
        // and deleting it afterwards would lose the only copy.
        if mode == JobMode::File && !keep_original && source.parent() == Some(destination.as_path()) {
            return Err(CompressError::Config(format!(
                "Destination {} is the directory of the source; use --keep or another destination",
                destination.display()
            )));
        }

        // oxipng writes next to the originals, so the cleanup could not tell them apart
        if mode == JobMode::Directory && !keep_original && source == destination {
            return Err(CompressError::Config(format!(
                "Destination {} is the source directory; use --keep or another destination",
                destination.display()
            )));
        }

        Ok(Self {
            source,
            destination,
            mode,
            threads,
            keep_original,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CompressError> {
        Self::new(&config.source, &config.destination, config.threads, config.keep)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn mode(&self) -> JobMode {
        self.mode
    }

    pub fn is_directory(&self) -> bool {
        self.mode == JobMode::Directory
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn keep_original(&self) -> bool {
        self.keep_original
    }

    /// Basename of the source for reporting
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Make `path` absolute against the current directory and drop `.`/`..`
/// components without touching the filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf, CompressError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
