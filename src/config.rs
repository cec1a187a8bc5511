use std::path::PathBuf;

/// Default Tesseract language for Turkish product labels
pub const DEFAULT_LANGUAGE: &str = "tur";

/// Server and scanner configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub language: String,
    /// Engine used when a request does not name one; registry default when unset
    pub engine: Option<String>,
    pub max_file_size: usize,
    pub tessdata_path: Option<String>,
    /// Directory for per-pass debug images; no-op sink when unset
    pub diagnostics_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9393,
            language: DEFAULT_LANGUAGE.to_string(),
            engine: None,
            max_file_size: 20 * 1024 * 1024,
            tessdata_path: None,
            diagnostics_dir: None,
        }
    }
}
