//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};

use crate::inference::InferenceError;
use crate::models::{ErrorResponse, Shape};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Readiness errors
    ModelNotLoaded,

    // Client input errors
    InvalidShape(Shape),

    // Body could not be decoded (malformed JSON, wrong element types)
    BadRequest(String),

    // Scaler or classifier failure
    Inference(InferenceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidShape(_) => StatusCode::BAD_REQUEST,
            AppError::ModelNotLoaded
            | AppError::BadRequest(_)
            | AppError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::ModelNotLoaded => "Model not loaded".to_string(),
            AppError::InvalidShape(shape) => {
                format!("Invalid sequence shape. Expected {}, got {}", Shape::expected(), shape)
            }
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Inference(err) => err.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.message();

        match &self {
            AppError::InvalidShape(_) => tracing::warn!("Rejected request: {}", error),
            AppError::ModelNotLoaded => tracing::error!("Prediction requested before model load"),
            _ => tracing::error!("Prediction error: {}", error),
        }

        (status, Json(ErrorResponse::new(error))).into_response()
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::Inference(err)
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
