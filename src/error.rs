//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Mappa ogni categoria sul codice di uscita del processo
//!
//! ## Categorie di errori:
//! - `Config`: Parametri non validi (threads, timeout, path, file di settings)
//! - `MissingOptimizer`: Eseguibile oxipng non trovato
//! - `Launch`: Il sottoprocesso non è partito
//! - `OptimizerFailed`: oxipng è uscito con codice diverso da zero
//! - `Timeout`: oxipng terminato dopo la scadenza del timeout
//! - `Cleanup`: Compressione riuscita ma rimozione dell'originale fallita
//! - `Io`: Errori di I/O generici
//!
//! ## Codici di uscita:
//! | Errore            | Codice |
//! |-------------------|--------|
//! | `Config`          | 2 |
//! | `OptimizerFailed` | codice di oxipng |
//! | `Timeout`         | 124 |
//! | `MissingOptimizer` / `Launch` | 127 |
//! | `Cleanup` / `Io`  | 1 |
//!
//! ## Esempio:
//! ```ignore
//! if threads == 0 {
//!     return Err(CompressError::Config("threads must be greater than 0".into()));
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Exit code for invalid configuration, same as clap's usage errors.
pub const EXIT_CONFIG: i32 = 2;
/// Exit code after a timeout, as reported by coreutils `timeout`.
pub const EXIT_TIMEOUT: i32 = 124;
/// Exit code when the optimizer cannot be found or started.
pub const EXIT_LAUNCH: i32 = 127;

/// Custom error types for screenshot compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Optimizer not found: {0}")]
    MissingOptimizer(String),

    #[error("Failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Optimizer exited with code {code}")]
    OptimizerFailed { code: i32, stderr: String },

    #[error("Optimizer timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Compressed but cleanup failed for {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompressError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::MissingOptimizer(_) | Self::Launch { .. } => EXIT_LAUNCH,
            Self::OptimizerFailed { code, .. } => *code,
            Self::Timeout(_) => EXIT_TIMEOUT,
            Self::Cleanup { .. } | Self::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_code_passes_through() {
        let err = CompressError::OptimizerFailed { code: 3, stderr: "bad png".to_string() };
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CompressError::Config("threads".into()).exit_code(), EXIT_CONFIG);
        assert_eq!(CompressError::MissingOptimizer("oxipng".into()).exit_code(), EXIT_LAUNCH);
        assert_eq!(CompressError::Timeout(Duration::from_secs(5)).exit_code(), EXIT_TIMEOUT);

        let cleanup = CompressError::Cleanup {
            path: PathBuf::from("/tmp/shot.png"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(cleanup.exit_code(), 1);
        assert!(cleanup.to_string().starts_with("Compressed but cleanup failed"));
    }
}
