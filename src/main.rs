//! # Screenshot Compressor - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap` (flag + variabili `SSC_*`)
//! - Inizializzazione del sistema di logging con `tracing`
//! - Risoluzione della configurazione a livelli e del path di oxipng
//! - Traduzione del risultato del dispatcher nel codice di uscita del processo
//!
//! ## Esempio di utilizzo:
//! ```bash
//! ssc ~/Media/Pictures/Screenshots --threads 4 --keep
//! ssc shot.png /tmp/compressed
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use screenshot_compressor::{
    tool_resolver::OPTIMIZER_NAME, CompressError, Config, ConfigLayer, Dispatcher, Job, Outcome,
    ProcessRunner, ToolPathResolver,
};

#[derive(Parser)]
#[command(name = "ssc", version)]
#[command(about = "Compress PNG screenshots with oxipng")]
struct Args {
    /// PNG file or directory of images to compress [default: current directory]
    source: Option<PathBuf>,

    /// Destination directory for the compressed image(s)
    /// [default: ~/Media/Pictures/Screenshots/Compressed]
    destination: Option<PathBuf>,

    /// Threads oxipng uses for directories [default: half the logical CPUs]
    #[arg(short, long, env = "SSC_THREADS")]
    threads: Option<usize>,

    /// Keep the original file(s)
    #[arg(short, long, env = "SSC_KEEP")]
    keep: bool,

    /// Path to the oxipng executable [default: search PATH and ~/.cargo/bin]
    #[arg(long, env = "SSC_OPTIMIZER", value_name = "PATH")]
    optimizer: Option<PathBuf>,

    /// Kill oxipng if it runs longer than this many seconds
    #[arg(long, env = "SSC_TIMEOUT", value_name = "SECS")]
    timeout: Option<u64>,

    /// Settings file [default: <config dir>/screenshot-compressor/config.json]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the oxipng command without running it
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let code = match run(args).await {
        Ok(outcome) => {
            debug!("Finished: {:?}", outcome);
            0
        }
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    };

    ExitCode::from(exit_byte(code))
}

/// Low byte of an exit code, the part a unix parent sees from `wait`
fn exit_byte(code: i32) -> u8 {
    code as u8
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run(args: Args) -> Result<Outcome, CompressError> {
    let cli = ConfigLayer {
        destination: args.destination,
        threads: args.threads,
        keep: args.keep.then_some(true),
        optimizer: args.optimizer,
        timeout_secs: args.timeout,
    };
    let settings = ConfigLayer::load(args.config.as_deref()).await?;
    let config = Config::resolve(args.source, cli.or(settings), args.dry_run)?;
    debug!("Resolved configuration: {:?}", config);

    let job = Job::from_config(&config)?;

    let optimizer = match ToolPathResolver::new(config.optimizer.clone()).resolve() {
        Ok(path) => path,
        Err(e) if config.dry_run => {
            warn!("{}", e);
            PathBuf::from(OPTIMIZER_NAME)
        }
        Err(e) => return Err(e),
    };

    let dispatcher = Dispatcher::new(optimizer, ProcessRunner::new(config.timeout()))
        .with_progress(!args.verbose);
    dispatcher.dispatch(&job, config.dry_run).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_byte_truncates() {
        assert_eq!(exit_byte(0), 0);
        assert_eq!(exit_byte(3), 3);
        assert_eq!(exit_byte(137), 137);
        assert_eq!(exit_byte(256 + 5), 5);
        assert_eq!(exit_byte(-1), 255);
    }
}
