//! OCR engine implementations
//!
//! This module contains implementations of the OcrEngine trait for different
//! OCR backends. Engines are conditionally compiled based on feature flags.

#[cfg(any(feature = "engine-ocrs", feature = "engine-tesseract"))]
mod download;

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-tesseract")]
pub mod tesseract;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use serde::Serialize;
use std::sync::Arc;

/// Information about an available engine
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<String>,
}

/// Registry of available OCR engines
pub struct EngineRegistry {
    engines: Vec<Arc<dyn OcrEngine>>,
    default_engine: String,
}

impl EngineRegistry {
    /// Create a new engine registry with all available engines initialized
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        #[allow(unused_mut)]
        let mut engines: Vec<Arc<dyn OcrEngine>> = Vec::new();

        #[cfg(feature = "engine-tesseract")]
        {
            tracing::info!("Initializing tesseract engine...");
            engines.push(Arc::new(tesseract::TesseractEngine::new(config)?));
        }

        #[cfg(feature = "engine-ocrs")]
        {
            tracing::info!("Initializing ocrs engine...");
            engines.push(Arc::new(ocrs::OcrsEngine::new(config)?));
        }

        if engines.is_empty() {
            return Err(OcrError::InitializationError(
                "No OCR engines available. Build with --features engine-ocrs or --features engine-tesseract".to_string()
            ));
        }

        Self::with_engines(engines, config.engine.as_deref())
    }

    /// Build a registry from already constructed engines.
    ///
    /// The first engine is the default unless `default` names another one.
    pub fn with_engines(
        engines: Vec<Arc<dyn OcrEngine>>,
        default: Option<&str>,
    ) -> Result<Self, OcrError> {
        let first = engines
            .first()
            .map(|e| e.name().to_string())
            .ok_or_else(|| OcrError::InitializationError("Engine list is empty".to_string()))?;

        let default_engine = match default {
            Some(name) if engines.iter().any(|e| e.name() == name) => name.to_string(),
            Some(name) => return Err(OcrError::UnknownEngine(name.to_string())),
            None => first,
        };

        Ok(Self {
            engines,
            default_engine,
        })
    }

    /// Get an engine by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn OcrEngine>> {
        self.engines.iter().find(|e| e.name() == name).cloned()
    }

    /// Get the default engine
    pub fn default(&self) -> Option<Arc<dyn OcrEngine>> {
        self.get(&self.default_engine)
    }

    /// Get the default engine name
    pub fn default_name(&self) -> &str {
        &self.default_engine
    }

    /// List all available engine names
    pub fn list(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Get info about all available engines
    pub fn info(&self) -> Vec<EngineInfo> {
        self.engines
            .iter()
            .map(|e| EngineInfo {
                name: e.name(),
                description: e.description(),
                supported_languages: e.supported_languages(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RecognitionConfig;
    use image::DynamicImage;

    struct NamedEngine(&'static str);

    impl OcrEngine for NamedEngine {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "test engine"
        }

        fn recognize(&self, _: &DynamicImage, _: &RecognitionConfig) -> Result<String, OcrError> {
            Ok(String::new())
        }

        fn supported_languages(&self) -> Vec<String> {
            vec!["tur".to_string()]
        }
    }

    #[test]
    fn test_first_engine_is_default() {
        let registry = EngineRegistry::with_engines(
            vec![Arc::new(NamedEngine("a")), Arc::new(NamedEngine("b"))],
            None,
        )
        .unwrap();
        assert_eq!(registry.default_name(), "a");
        assert_eq!(registry.list(), vec!["a", "b"]);
    }

    #[test]
    fn test_explicit_default_must_exist() {
        let result = EngineRegistry::with_engines(vec![Arc::new(NamedEngine("a"))], Some("zzz"));
        assert!(matches!(result, Err(OcrError::UnknownEngine(_))));

        let registry =
            EngineRegistry::with_engines(vec![Arc::new(NamedEngine("a")), Arc::new(NamedEngine("b"))], Some("b"))
                .unwrap();
        assert_eq!(registry.default().unwrap().name(), "b");
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        assert!(EngineRegistry::with_engines(Vec::new(), None).is_err());
    }
}
