use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipeline::IntakePipeline;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub message: String,
    pub rows: usize,
    pub skipped_lines: usize,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Normalize one block of listing text and append the resulting rows to
/// every configured destination.
pub async fn process_text(
    State(state): State<AppState>,
    Json(payload): Json<IntakeRequest>,
) -> Result<Json<IntakeResponse>, (StatusCode, Json<Value>)> {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] intake request, {} bytes of text",
        request_id,
        payload.text.len()
    );

    let mut pipeline = IntakePipeline::new(&state.config.pipeline);
    let outcome = pipeline.process(&payload.text);

    if outcome.is_empty() {
        // Zero records is a reportable outcome, not a failure.
        info!("[{}] no products found", request_id);
        return Ok(Json(IntakeResponse {
            message: "No products found in the submitted text.".to_string(),
            rows: 0,
            skipped_lines: outcome.skipped_lines,
        }));
    }

    match state.delivery.deliver(&outcome.records).await {
        Ok(()) => {
            let rows = outcome.records.len();
            info!(
                "[{}] {} rows appended to {} destination(s)",
                request_id,
                rows,
                state.delivery.destination_count()
            );
            Ok(Json(IntakeResponse {
                message: format!(
                    "{} rows added to {} destination(s) for the products.",
                    rows,
                    state.delivery.destination_count()
                ),
                rows,
                skipped_lines: outcome.skipped_lines,
            }))
        }
        Err(e) => {
            let error = AppError::from(e);
            error!("[{}] delivery failed: {}", request_id, error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            ))
        }
    }
}
