//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::{AppError, AppResult, AppState};
use crate::models::{parse_sequence, PredictRequest, PredictResponse};

/// Score the most recent time-step of a 24 x 145 window
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let bundle = state.model.get().ok_or(AppError::ModelNotLoaded)?;

    let Json(body) = payload?;
    if !body.is_object() {
        return Err(AppError::BadRequest(format!(
            "request body must be a JSON object, got {}",
            json_type(&body)
        )));
    }
    let req: PredictRequest =
        serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let sequence = parse_sequence(&req.sequence)?;
    let prediction = bundle.score(&sequence)?;

    tracing::debug!("Scored sequence: anomaly_score={:.4}", prediction.anomaly_score);

    Ok(Json(prediction.into()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
