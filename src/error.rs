//! Error types for the Loteamento server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ocr::OcrError;
use crate::pdf::RasterizeError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Local pattern/numeric failures never reach here; the extraction engine
/// absorbs them. Only missing input and infrastructure failures surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// No PDF file supplied in the upload (user-facing message in Portuguese,
    /// matching the product's audience)
    #[error("Nenhum arquivo PDF enviado")]
    MissingFile,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("PDF rasterization failed: {0}")]
    Rasterize(#[from] RasterizeError),

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingFile => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Rasterize(e) => {
                tracing::error!("Rasterization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Erro no processamento: {}", e),
                )
            }
            AppError::Ocr(e) => {
                tracing::error!("OCR error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Erro no processamento: {}", e),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_missing_file_is_bad_request() {
        let response = AppError::MissingFile.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_infrastructure_failures_are_internal_errors() {
        let response = AppError::Rasterize(RasterizeError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response =
            AppError::Ocr(OcrError::EngineUnavailable("tesseract".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
