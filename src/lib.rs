//! # Screenshot Compressor Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per i test
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione a livelli e validazione parametri
//! - `error`: Tipi di errore e codici di uscita
//! - `job`: Job immutabile con path assoluti e modalità file/directory
//! - `tool_resolver`: Ricerca dell'eseguibile oxipng
//! - `runner`: Esecuzione del sottoprocesso con timeout opzionale
//! - `dispatcher`: Argomenti, esecuzione, report e pulizia degli originali
//! - `file_manager`: Operazioni sui file PNG
//! - `progress`: Spinner durante l'esecuzione
//!
//! ## Utilizzo:
//! ```ignore
//! use screenshot_compressor::{Dispatcher, Job, ProcessRunner, ToolPathResolver};
//!
//! let job = Job::new(&source, &destination, 4, false)?;
//! let optimizer = ToolPathResolver::default().resolve()?;
//! let dispatcher = Dispatcher::new(optimizer, ProcessRunner::default());
//! dispatcher.dispatch(&job, false).await?;
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod file_manager;
pub mod job;
pub mod progress;
pub mod runner;
pub mod tool_resolver;
pub mod utils;

pub use config::{Config, ConfigLayer};
pub use dispatcher::{build_args, Disposition, Dispatcher, Outcome};
pub use error::CompressError;
pub use job::{Job, JobMode};
pub use runner::{OptimizerRunner, ProcessRunner, SubprocessResult};
pub use tool_resolver::ToolPathResolver;
