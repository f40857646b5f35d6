//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di compressione
//! - Risolve i valori con precedenza flag → env → file di settings → default
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio dei settings da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `source`: File PNG o directory da comprimere (default: directory corrente)
//! - `destination`: Directory di output (default: `~/Media/Pictures/Screenshots/Compressed`)
//! - `threads`: Thread passati a oxipng in modalità directory (default: metà delle CPU logiche)
//! - `keep`: Mantiene gli originali (default: false)
//! - `optimizer`: Path esplicito dell'eseguibile oxipng (default: ricerca nel PATH)
//! - `timeout_secs`: Timeout del sottoprocesso (default: nessuno)
//! - `dry_run`: Stampa il comando senza eseguirlo (default: false)
//!
//! ## Precedenza:
//! I flag CLI e le variabili `SSC_*` arrivano già fusi da clap in un unico
//! `ConfigLayer`; sotto stanno il file di settings e i default hardcoded.
//!
//! ## Esempio:
//! ```ignore
//! let cli = ConfigLayer { threads: Some(8), ..Default::default() };
//! let file = ConfigLayer::load(None).await?;
//! let config = Config::resolve(None, cli.or(file), false)?;
//! ```

use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Directory name under the user's config dir holding the settings file
pub const SETTINGS_DIR: &str = "screenshot-compressor";
/// Settings file name
pub const SETTINGS_FILE: &str = "config.json";

/// `~/Media/Pictures/Screenshots/Compressed`
pub fn default_destination() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join("Media")
            .join("Pictures")
            .join("Screenshots")
            .join("Compressed")
    })
}

/// Half of the logical CPUs, never less than one
pub fn default_threads() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    (cpus / 2).max(1)
}

/// Default location of the settings file
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// One precedence level of configuration. Every field is optional so layers
/// can be stacked with [`ConfigLayer::or`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub destination: Option<PathBuf>,
    pub threads: Option<usize>,
    pub keep: Option<bool>,
    pub optimizer: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Fill the unset fields of `self` from a lower-precedence layer
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            destination: self.destination.or(lower.destination),
            threads: self.threads.or(lower.threads),
            keep: self.keep.or(lower.keep),
            optimizer: self.optimizer.or(lower.optimizer),
            timeout_secs: self.timeout_secs.or(lower.timeout_secs),
        }
    }

    /// Load the settings layer.
    ///
    /// An explicit path must exist. Without one, the default settings file is
    /// read when present and an empty layer is returned otherwise.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, CompressError> {
        match explicit {
            Some(path) => Self::from_file(path).await,
            None => match default_settings_path() {
                Some(path) if path.exists() => Self::from_file(&path).await,
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load a settings layer from a JSON file
    pub async fn from_file(path: &Path) -> Result<Self, CompressError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CompressError::Config(format!("Cannot read settings file {}: {}", path.display(), e))
        })?;
        let layer: ConfigLayer = serde_json::from_str(&content).map_err(|e| {
            CompressError::Config(format!("Invalid settings file {}: {}", path.display(), e))
        })?;
        debug!("Loaded settings from {}: {:?}", path.display(), layer);
        Ok(layer)
    }

    /// Save the layer to a JSON file, creating parent directories
    pub async fn save_to_file(&self, path: &Path) -> Result<(), CompressError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CompressError::Config(format!("Cannot serialize settings: {}", e)))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Fully resolved configuration for one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// PNG file or directory to compress
    pub source: PathBuf,
    /// Directory receiving the compressed output
    pub destination: PathBuf,
    /// Threads handed to the optimizer in directory mode
    pub threads: usize,
    /// Keep the original file(s) after a successful run
    pub keep: bool,
    /// Explicit optimizer executable (None = search PATH)
    pub optimizer: Option<PathBuf>,
    /// Kill the optimizer after this many seconds
    pub timeout_secs: Option<u64>,
    /// Only print the command
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            destination: default_destination().unwrap_or_else(|| PathBuf::from("Compressed")),
            threads: default_threads(),
            keep: false,
            optimizer: None,
            timeout_secs: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Collapse the merged layers onto the hardcoded defaults and validate.
    pub fn resolve(
        source: Option<PathBuf>,
        layer: ConfigLayer,
        dry_run: bool,
    ) -> Result<Self, CompressError> {
        let source = match source {
            Some(source) => source,
            None => std::env::current_dir()?,
        };

        let destination = layer
            .destination
            .or_else(default_destination)
            .ok_or_else(|| {
                CompressError::Config(
                    "Cannot determine the home directory; pass a destination explicitly".to_string(),
                )
            })?;

        let config = Self {
            source,
            destination,
            threads: layer.threads.unwrap_or_else(default_threads),
            keep: layer.keep.unwrap_or(false),
            optimizer: layer.optimizer,
            timeout_secs: layer.timeout_secs,
            dry_run,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.threads == 0 {
            return Err(CompressError::Config(
                "Number of threads must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(CompressError::Config(
                "Timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.source.as_os_str().is_empty() {
            return Err(CompressError::Config("Source path is empty".to_string()));
        }

        if self.destination.exists() && !self.destination.is_dir() {
            return Err(CompressError::Config(format!(
                "Destination is not a directory: {}",
                self.destination.display()
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
