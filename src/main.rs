use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use skt_reader::config::{Config, DEFAULT_LANGUAGE};
use skt_reader::engines::EngineRegistry;
use skt_reader::extraction::CandidateView;
use skt_reader::pipeline::{default_passes, PassSummary, Scanner};
use skt_reader::{diagnostics, server};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "skt-reader")]
#[command(about = "Reads expiry dates (SKT) from product label photos")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Host address to bind to
    #[arg(long, env = "SKT_HOST", default_value = "127.0.0.1", global = true)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SKT_PORT", default_value = "9393", global = true)]
    pub port: u16,

    /// Tesseract language for recognition (e.g., "tur", "eng", "tur+eng")
    #[arg(long, env = "SKT_LANGUAGE", default_value = DEFAULT_LANGUAGE, global = true)]
    pub language: String,

    /// OCR engine to use (defaults to the first available engine)
    #[arg(long, env = "SKT_ENGINE", global = true)]
    pub engine: Option<String>,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "SKT_MAX_FILE_SIZE", default_value = "20971520", global = true)]
    pub max_file_size: usize,

    /// Path to tessdata directory (traineddata is downloaded when not set)
    #[arg(long, env = "TESSDATA_PREFIX", global = true)]
    pub tessdata_path: Option<String>,

    /// Directory for per-pass debug images (disabled when not set)
    #[arg(long, env = "SKT_DIAGNOSTICS_DIR", global = true)]
    pub diagnostics_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Scan a single photo and print the detected date
    Scan {
        /// Image file to scan
        path: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            language: args.language.clone(),
            engine: args.engine.clone(),
            max_file_size: args.max_file_size,
            tessdata_path: args.tessdata_path.clone(),
            diagnostics_dir: args.diagnostics_dir.clone(),
        }
    }
}

/// JSON report printed by `scan --json`
#[derive(Serialize)]
struct ScanOutput {
    found: bool,
    expiry_date: Option<String>,
    production_date: Option<String>,
    display: String,
    engine: &'static str,
    candidates: Vec<CandidateView>,
    passes: Vec<PassSummary>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from(&args);

    match args.command {
        None | Some(Command::Serve) => {
            tracing::info!("Starting skt-reader v{}", env!("CARGO_PKG_VERSION"));
            tracing::info!("Binding to {}:{}", config.host, config.port);
            server::run(config).await
        }
        Some(Command::Scan { path, json }) => {
            tokio::task::spawn_blocking(move || scan_file(&config, &path, json)).await?
        }
    }
}

fn scan_file(config: &Config, path: &Path, json: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;

    let registry = EngineRegistry::new(config)?;
    let engine = registry
        .default()
        .context("No default OCR engine available")?;

    let scanner = Scanner::new(engine, default_passes(&config.language))
        .with_diagnostics(diagnostics::sink_for(config)?);
    let namespace = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "cli".to_string());

    let report = scanner.scan_bytes(&bytes, &namespace)?;

    if json {
        let output = ScanOutput {
            found: report.detection.is_found(),
            expiry_date: report.detection.expiry_str(),
            production_date: report.detection.production_str(),
            display: report.detection.to_string(),
            engine: scanner.engine_name(),
            candidates: report.candidates.iter().map(CandidateView::from).collect(),
            passes: report.passes,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", report.detection);
    }

    Ok(())
}
