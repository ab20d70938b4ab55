use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::CandidateSubmission;
use super::pipeline::{ScreeningReport, TrainedPipeline};
use crate::error::AppError;

/// Router builder exposing classification and model metadata endpoints.
pub fn screening_router(pipeline: Arc<TrainedPipeline>) -> Router {
    Router::new()
        .route("/api/v1/screening/classify", post(classify_handler))
        .route("/api/v1/screening/model", get(model_handler))
        .with_state(pipeline)
}

/// Rejected input maps to 422 and internal failures to 500 through [`AppError`].
pub(crate) async fn classify_handler(
    State(pipeline): State<Arc<TrainedPipeline>>,
    Json(submission): Json<CandidateSubmission>,
) -> Result<Json<ScreeningReport>, AppError> {
    Ok(Json(pipeline.screen(submission)?))
}

pub(crate) async fn model_handler(State(pipeline): State<Arc<TrainedPipeline>>) -> Response {
    let payload = json!({
        "schema": pipeline.schema(),
        "class_order": pipeline.class_order(),
        "card": pipeline.model_card(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}
