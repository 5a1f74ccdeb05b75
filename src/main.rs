//! # WebP Batch Converter - Main Entry Point
//!
//! Punto di ingresso dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Risoluzione delle directory di input e output
//! - Collegamento di Ctrl-C alla cancellazione dello scheduler
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (directory, qualità, workers, ...)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Input = argomento o directory corrente, output = `<input>/Processed_Images`
//! 4. Crea il Config e avvia lo Scheduler
//!
//! ## Esempio di utilizzo:
//! ```bash
//! image-to-webp ~/Pictures --workers 8 --verbose
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use webp_batch_converter::config::DEFAULT_OUTPUT_DIR_NAME;
use webp_batch_converter::json_output::JsonMessage;
use webp_batch_converter::quality::{DEFAULT_HIGH_QUALITY, DEFAULT_STANDARD_QUALITY};
use webp_batch_converter::{Config, RunSummary, Scheduler};

#[derive(Parser)]
#[command(name = "image-to-webp")]
#[command(about = "Recursively convert JPG, PNG, BMP and TIFF images to WebP")]
struct Args {
    /// Directory to scan (defaults to the current directory)
    input_directory: Option<PathBuf>,

    /// Output directory (defaults to <input>/Processed_Images)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// WebP quality for regular images (0-100)
    #[arg(short, long, default_value_t = DEFAULT_STANDARD_QUALITY)]
    quality: u8,

    /// WebP quality for thumbnails and large images (0-100)
    #[arg(long, default_value_t = DEFAULT_HIGH_QUALITY)]
    high_quality: u8,

    /// Number of parallel conversions
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Emit newline-delimited JSON events on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let builder = tracing_subscriber::fmt().with_max_level(level);
    if args.json {
        // stdout resta riservato agli eventi JSON
        tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let json = args.json;
    match run(args).await {
        Ok(_) => Ok(()),
        Err(e) => {
            if json {
                JsonMessage::error("Conversion failed".to_string(), Some(format!("{:#}", e))).emit();
            }
            Err(e)
        }
    }
}

async fn run(args: Args) -> Result<RunSummary> {
    let root_dir = match args.input_directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let root_dir = root_dir
        .canonicalize()
        .with_context(|| format!("Input directory does not exist: {}", root_dir.display()))?;

    let output_dir = args
        .output
        .unwrap_or_else(|| root_dir.join(DEFAULT_OUTPUT_DIR_NAME));
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Cannot create output directory: {}", output_dir.display()))?;
        info!("Created output directory: {}", output_dir.display());
    }
    if !output_dir.is_dir() {
        return Err(anyhow::anyhow!("Output path is not a directory: {}", output_dir.display()));
    }
    let output_dir = output_dir.canonicalize()?;

    let config = Config {
        standard_quality: args.quality,
        high_quality: args.high_quality,
        workers: args.workers,
        json_output: args.json,
        ..Default::default()
    };

    let (stop_sender, stop_receiver) = Scheduler::create_cancellation_channel(1);
    let mut scheduler = Scheduler::new(config)?.with_cancellation(stop_receiver);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted: finishing conversions already in progress");
            let _ = stop_sender.send(());
        }
    });

    scheduler.run(&root_dir, &output_dir).await
}
