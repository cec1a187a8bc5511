//! Optional sink for intermediate pass images
//!
//! The scanner hands every preprocessed image to a [`DiagnosticsSink`] and clears
//! the namespace once the scan is over, so at most one artifact per pass index
//! exists for a namespace at any time.

use crate::config::Config;
use crate::error::OcrError;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

pub trait DiagnosticsSink: Send + Sync {
    /// Store the processed image of pass `pass_index`, replacing an earlier one
    fn record(
        &self,
        namespace: &str,
        pass_index: usize,
        image: &DynamicImage,
    ) -> Result<(), OcrError>;

    /// Remove every artifact of `namespace`. Best effort, never fails.
    fn clear(&self, namespace: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn record(&self, _: &str, _: usize, _: &DynamicImage) -> Result<(), OcrError> {
        Ok(())
    }

    fn clear(&self, _: &str) {}
}

/// Writes `<namespace>_debug_<index>.png` files into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, OcrError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            OcrError::InitializationError(format!(
                "Failed to create diagnostics directory {:?}: {}",
                dir, e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn artifact_path(&self, namespace: &str, pass_index: usize) -> PathBuf {
        self.dir
            .join(format!("{}{}.png", prefix(namespace), pass_index))
    }
}

impl DiagnosticsSink for DirectorySink {
    fn record(
        &self,
        namespace: &str,
        pass_index: usize,
        image: &DynamicImage,
    ) -> Result<(), OcrError> {
        let path = self.artifact_path(namespace, pass_index);
        image.save(&path).map_err(|e| {
            OcrError::Internal(format!("Failed to write diagnostic image {:?}: {}", path, e))
        })
    }

    fn clear(&self, namespace: &str) {
        let prefix = prefix(namespace);
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to list diagnostics directory {:?}: {}", self.dir, e);
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let is_artifact = name
                .to_string_lossy()
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".png"))
                .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()));
            if is_artifact {
                if let Err(e) = std::fs::remove_file(entry.path()) {
                    tracing::warn!("Failed to remove {:?}: {}", entry.path(), e);
                }
            }
        }
    }
}

/// Directory sink when `diagnostics_dir` is configured, no-op otherwise
pub fn sink_for(config: &Config) -> Result<Arc<dyn DiagnosticsSink>, OcrError> {
    Ok(match &config.diagnostics_dir {
        Some(dir) => Arc::new(DirectorySink::new(dir)?),
        None => Arc::new(NoopSink),
    })
}

/// Keep namespaces usable as file name components
pub fn sanitize_namespace(namespace: &str) -> String {
    let cleaned: String = namespace
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(64)
        .collect();

    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}

fn prefix(namespace: &str) -> String {
    format!("{}_debug_", sanitize_namespace(namespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn tiny() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([9])))
    }

    #[test]
    fn test_sanitize_namespace() {
        assert_eq!(sanitize_namespace("user-42"), "user-42");
        assert_eq!(sanitize_namespace("../../etc"), "etc");
        assert_eq!(sanitize_namespace("///"), "default");
    }

    #[test]
    fn test_directory_sink_overwrites_by_index_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path()).unwrap();

        sink.record("u1", 0, &tiny()).unwrap();
        sink.record("u1", 0, &tiny()).unwrap();
        sink.record("u1", 1, &tiny()).unwrap();
        sink.record("u2", 0, &tiny()).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);

        sink.clear("u1");

        assert!(!sink.artifact_path("u1", 0).exists());
        assert!(!sink.artifact_path("u1", 1).exists());
        assert!(sink.artifact_path("u2", 0).exists());
    }

    #[test]
    fn test_clear_of_unknown_namespace_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path()).unwrap();
        sink.clear("nobody");
        NoopSink.clear("nobody");
    }
}
