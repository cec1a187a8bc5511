//! Multi-pass scan orchestration
//!
//! A scan runs every [`PipelinePass`] in order on the same decoded photo, pools the
//! candidates of all passes and ranks the pool once. A failing pass contributes
//! nothing; only an undecodable photo fails the scan.

use crate::diagnostics::{DiagnosticsSink, NoopSink};
use crate::engine::{OcrEngine, RecognitionConfig};
use crate::error::OcrError;
use crate::extraction::{self, Candidate};
use crate::preprocessing::Recipe;
use crate::ranking::{self, Detection};
use image::DynamicImage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// One preprocessing recipe paired with one recognition setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelinePass {
    pub recipe: Recipe,
    pub config: RecognitionConfig,
}

impl PipelinePass {
    pub fn new(recipe: Recipe, config: RecognitionConfig) -> Self {
        Self { recipe, config }
    }
}

/// The fixed pass list used for label photos
pub fn default_passes(language: &str) -> Vec<PipelinePass> {
    vec![
        PipelinePass::new(Recipe::Basic, RecognitionConfig::with_psm(6, language)),
        PipelinePass::new(Recipe::Basic, RecognitionConfig::with_psm(11, language)),
        PipelinePass::new(Recipe::Adaptive, RecognitionConfig::with_psm(6, language)),
        PipelinePass::new(Recipe::Advanced, RecognitionConfig::with_psm(6, language)),
    ]
}

/// What happened in a single pass
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub index: usize,
    pub recipe: Recipe,
    pub config: String,
    pub candidates: usize,
    pub time_ms: u64,
    pub error: Option<String>,
}

/// Full outcome of a scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub detection: Detection,
    /// Pooled candidates of all passes in encounter order
    pub candidates: Vec<Candidate>,
    pub passes: Vec<PassSummary>,
}

/// Runs the pass list against one engine
#[derive(Clone)]
pub struct Scanner {
    engine: Arc<dyn OcrEngine>,
    passes: Vec<PipelinePass>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Scanner {
    pub fn new(engine: Arc<dyn OcrEngine>, passes: Vec<PipelinePass>) -> Self {
        Self {
            engine,
            passes,
            diagnostics: Arc::new(NoopSink),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Decode `bytes` and scan the photo
    pub fn scan_bytes(&self, bytes: &[u8], namespace: &str) -> Result<ScanReport, OcrError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| OcrError::DecodeFailure(e.to_string()))?;

        tracing::debug!(
            "Decoded {}x{} image for namespace '{}'",
            image.width(),
            image.height(),
            namespace
        );

        Ok(self.scan_image(&image, namespace))
    }

    /// Scan an already decoded photo through every pass
    pub fn scan_image(&self, image: &DynamicImage, namespace: &str) -> ScanReport {
        let _cleanup = ClearOnDrop {
            sink: self.diagnostics.as_ref(),
            namespace,
        };

        let mut candidates = Vec::new();
        let mut passes = Vec::with_capacity(self.passes.len());

        for (index, pass) in self.passes.iter().enumerate() {
            let start = Instant::now();
            let outcome = self.run_pass(index, pass, image, namespace);
            let time_ms = start.elapsed().as_millis() as u64;

            let summary = match outcome {
                Ok(found) => {
                    tracing::info!(
                        "Pass {} ({} {}) produced {} candidate(s) in {}ms",
                        index,
                        pass.recipe,
                        pass.config,
                        found.len(),
                        time_ms
                    );
                    let count = found.len();
                    candidates.extend(found);
                    PassSummary {
                        index,
                        recipe: pass.recipe,
                        config: pass.config.to_string(),
                        candidates: count,
                        time_ms,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Pass {} ({} {}) failed: {}",
                        index,
                        pass.recipe,
                        pass.config,
                        e
                    );
                    PassSummary {
                        index,
                        recipe: pass.recipe,
                        config: pass.config.to_string(),
                        candidates: 0,
                        time_ms,
                        error: Some(e.to_string()),
                    }
                }
            };
            passes.push(summary);
        }

        let detection = ranking::select_best(&candidates);
        match ranking::best_candidate(&candidates) {
            Some(best) => tracing::info!(
                "Best of {} candidate(s): {} (confidence {:.1}, pattern {}, line '{}')",
                candidates.len(),
                detection,
                best.confidence,
                best.pattern,
                best.line
            ),
            None => tracing::info!("No expiry date found"),
        }

        ScanReport {
            detection,
            candidates,
            passes,
        }
    }

    fn run_pass(
        &self,
        index: usize,
        pass: &PipelinePass,
        image: &DynamicImage,
        namespace: &str,
    ) -> Result<Vec<Candidate>, OcrError> {
        let processed = pass.recipe.apply(image)?;
        tracing::debug!(
            "Pass {} preprocessing took {}ms ({:?})",
            index,
            processed.total_time_ms,
            processed.steps
        );

        if let Err(e) = self.diagnostics.record(namespace, index, &processed.image) {
            // Artifacts are debug output only
            tracing::warn!("Failed to record diagnostics for pass {}: {}", index, e);
        }

        let text = self.engine.recognize(&processed.image, &pass.config)?;
        tracing::debug!("Pass {} recognized text ({}): {:?}", index, pass.config, text);

        Ok(extraction::extract(&text))
    }
}

/// Clears a namespace when the scan ends, including by unwinding
struct ClearOnDrop<'a> {
    sink: &'a dyn DiagnosticsSink,
    namespace: &'a str,
}

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.sink.clear(self.namespace);
    }
}
