//! Expiry date ("SKT") extraction from product label photographs
//!
//! A photo goes through several preprocessing recipe and OCR setting pairs; the
//! recognized text of all passes is scanned for date patterns and the most
//! confident plausible date wins.
//!
//! ```no_run
//! use skt_reader::{config::Config, engines::EngineRegistry, pipeline::{default_passes, Scanner}};
//!
//! # fn main() -> Result<(), skt_reader::error::OcrError> {
//! let config = Config::default();
//! let registry = EngineRegistry::new(&config)?;
//! let engine = registry.default().expect("registry has a default engine");
//! let scanner = Scanner::new(engine, default_passes(&config.language));
//!
//! let bytes = std::fs::read("label.jpg").expect("readable photo");
//! let report = scanner.scan_bytes(&bytes, "example")?;
//! println!("{}", report.detection);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod engines;
pub mod error;
pub mod extraction;
pub mod pipeline;
pub mod preprocessing;
pub mod ranking;
pub mod server;

pub use engine::{OcrEngine, RecognitionConfig};
pub use error::OcrError;
pub use pipeline::{PipelinePass, ScanReport, Scanner};
pub use ranking::Detection;
