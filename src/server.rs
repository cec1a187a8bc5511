use crate::config::Config;
use crate::diagnostics::{self, sanitize_namespace, DiagnosticsSink};
use crate::engines::{EngineInfo, EngineRegistry};
use crate::error::OcrError;
use crate::extraction::CandidateView;
use crate::pipeline::{default_passes, PassSummary, PipelinePass, Scanner};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Source of the `req-<n>` suffix that keeps request namespaces unique
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<EngineRegistry>,
    pub config: Arc<Config>,
    pub passes: Arc<Vec<PipelinePass>>,
    pub diagnostics: Arc<dyn DiagnosticsSink>,
}

impl AppState {
    pub fn new(registry: EngineRegistry, config: Config) -> Result<Self, OcrError> {
        Ok(Self {
            registry: Arc::new(registry),
            passes: Arc::new(default_passes(&config.language)),
            diagnostics: diagnostics::sink_for(&config)?,
            config: Arc::new(config),
        })
    }
}

/// Scan response
#[derive(Serialize)]
pub struct ScanResponse {
    pub found: bool,
    pub expiry_date: Option<String>,
    pub production_date: Option<String>,
    /// `DD.MM.YYYY` or `DD.MM.YYYY (Üretim: DD.MM.YYYY)`, null when not found
    pub display: Option<String>,
    pub engine: String,
    pub processing_time_ms: u64,
    pub candidates: Vec<CandidateView>,
    pub passes: Vec<PassSummary>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub default_engine: String,
    pub available_engines: Vec<EngineInfo>,
    pub passes: Vec<PipelinePass>,
    pub max_file_size_bytes: usize,
    pub language: String,
}

/// Build the router for `state`
pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/scan", post(handle_scan))
        .route("/scan/:engine", post(handle_scan_with_engine))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        // Multipart framing needs some headroom over the file itself
        .layer(DefaultBodyLimit::max(max_file_size.saturating_add(64 * 1024)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let registry = EngineRegistry::new(&config)?;
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "Engines: {:?} (default: {})",
        registry.list(),
        registry.default_name()
    );

    let app = router(AppState::new(registry, config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle scan requests with the default engine
async fn handle_scan(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScanResponse>, OcrError> {
    let engine = state.registry.default_name().to_string();
    scan(state, &engine, multipart).await
}

/// Handle scan requests with an explicit engine
async fn handle_scan_with_engine(
    State(state): State<AppState>,
    Path(engine): Path<String>,
    multipart: Multipart,
) -> Result<Json<ScanResponse>, OcrError> {
    scan(state, &engine, multipart).await
}

async fn scan(
    state: AppState,
    engine_name: &str,
    mut multipart: Multipart,
) -> Result<Json<ScanResponse>, OcrError> {
    let start = Instant::now();

    let engine = state
        .registry
        .get(engine_name)
        .ok_or_else(|| OcrError::UnknownEngine(engine_name.to_string()))?;

    let mut file_data: Option<Bytes> = None;
    let mut namespace: Option<String> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                file_data = Some(field.bytes().await.map_err(|e| {
                    OcrError::InvalidRequest(format!("Failed to read file data: {}", e))
                })?);
            }
            "namespace" => {
                namespace = Some(field.text().await.map_err(|e| {
                    OcrError::InvalidRequest(format!("Invalid namespace: {}", e))
                })?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    // Validate file was provided
    let data = file_data.ok_or(OcrError::MissingFile)?;

    // Check file size
    if data.len() > state.config.max_file_size {
        return Err(OcrError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let namespace = request_namespace(namespace.as_deref());

    let scanner =
        Scanner::new(engine, state.passes.as_ref().clone()).with_diagnostics(state.diagnostics.clone());

    // OCR is CPU bound; keep it off the async workers
    let report = tokio::task::spawn_blocking(move || scanner.scan_bytes(&data, &namespace))
        .await
        .map_err(|e| OcrError::Internal(format!("Scan task failed: {}", e)))??;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Scan completed in {}ms with {}: {}",
        processing_time_ms,
        engine_name,
        report.detection
    );

    let detection = report.detection;
    Ok(Json(ScanResponse {
        found: detection.is_found(),
        expiry_date: detection.expiry_str(),
        production_date: detection.production_str(),
        display: detection.is_found().then(|| detection.to_string()),
        engine: engine_name.to_string(),
        processing_time_ms,
        candidates: report.candidates.iter().map(CandidateView::from).collect(),
        passes: report.passes,
    }))
}

/// Diagnostics namespace for one request: `<client>-req-<n>`, or `req-<n>` without a client value
fn request_namespace(client: Option<&str>) -> String {
    let id = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    match client {
        Some(ns) => format!("{}-req-{}", sanitize_namespace(ns), id),
        None => format!("req-{}", id),
    }
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_engine: state.registry.default_name().to_string(),
        available_engines: state.registry.info(),
        passes: state.passes.as_ref().clone(),
        max_file_size_bytes: state.config.max_file_size,
        language: state.config.language.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_namespaces_are_unique() {
        let dotted = request_namespace(Some("user.7"));
        let plain = request_namespace(Some("user7"));
        let again = request_namespace(Some("user7"));

        assert!(dotted.starts_with("user7-req-"));
        assert!(plain.starts_with("user7-req-"));
        assert_ne!(dotted, plain);
        assert_ne!(plain, again);
    }

    #[test]
    fn test_request_namespace_without_client_value() {
        let ns = request_namespace(None);
        let id = ns.strip_prefix("req-").unwrap();
        assert!(id.parse::<u64>().is_ok());
        assert_eq!(sanitize_namespace(&ns), ns);
    }
}
