use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;
use talent_screen::config::ScreeningSettings;
use talent_screen::error::AppError;
use talent_screen::screening::TrainedPipeline;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fit the screening model once; the result is shared read-only by every request.
pub(crate) fn build_pipeline(settings: &ScreeningSettings) -> Result<Arc<TrainedPipeline>, AppError> {
    let started = Instant::now();
    let pipeline = TrainedPipeline::bootstrap(settings)?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        accuracy = pipeline.model_card().training_accuracy,
        "screening pipeline ready"
    );
    Ok(Arc::new(pipeline))
}
