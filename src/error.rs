use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("Text recognition failed: {0}")]
    RecognitionError(String),

    #[error("Preprocessing failed: {0}")]
    PreprocessingError(String),

    #[error("Unknown OCR engine: {0}")]
    UnknownEngine(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OcrError {
    /// Stable machine-readable code used in JSON error bodies
    pub fn code(&self) -> &'static str {
        match self {
            OcrError::InitializationError(_) => "INIT_ERROR",
            OcrError::DecodeFailure(_) => "DECODE_FAILURE",
            OcrError::RecognitionError(_) => "RECOGNITION_ERROR",
            OcrError::PreprocessingError(_) => "PREPROCESSING_ERROR",
            OcrError::UnknownEngine(_) => "UNKNOWN_ENGINE",
            OcrError::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            OcrError::MissingFile => "MISSING_FILE",
            OcrError::InvalidRequest(_) => "INVALID_REQUEST",
            OcrError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            OcrError::DecodeFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            OcrError::UnknownEngine(_) => StatusCode::NOT_FOUND,
            OcrError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            OcrError::MissingFile | OcrError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OcrError::InitializationError(_)
            | OcrError::RecognitionError(_)
            | OcrError::PreprocessingError(_)
            | OcrError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failure_maps_to_unprocessable_entity() {
        let response = OcrError::DecodeFailure("not an image".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_image_too_large_message() {
        let err = OcrError::ImageTooLarge { size: 10, max: 5 };
        assert_eq!(err.to_string(), "Image too large: 10 bytes (max: 5 bytes)");
        assert_eq!(err.code(), "IMAGE_TOO_LARGE");
    }
}
