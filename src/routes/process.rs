//! PDF Processing Route
//!
//! `POST /process-pdf`: multipart upload of a scanned survey PDF. The
//! handler runs the whole pipeline: rasterize every page, recognize each
//! page once per segmentation mode, pool the transcriptions into one corpus,
//! and extract the deduplicated plot records.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::extract::{extract_plots, PlotRecord};
use crate::ocr::MultiPassAggregator;
use crate::state::AppState;

/// Create the processing router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/process-pdf", post(process_pdf))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Result payload for a processed PDF
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub records: Vec<PlotRecord>,
    pub total_items: usize,
    pub pages_processed: usize,
}

/// POST /process-pdf
///
/// Accepts the PDF in a multipart field named `pdf` (or `file`). Responds
/// with the extracted record list plus counters, or an error payload if no
/// file was supplied or a pipeline step failed.
async fn process_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let pdf_bytes = read_pdf_field(&mut multipart).await?;

    if !pdf_bytes.starts_with(b"%PDF") {
        return Err(AppError::BadRequest(
            "O arquivo enviado não é um PDF válido".to_string(),
        ));
    }

    tracing::info!(size = pdf_bytes.len(), "Processing uploaded PDF");

    let pages = state.rasterizer().rasterize(pdf_bytes).await?;
    let pages_processed = pages.len();
    tracing::info!(pages = pages_processed, "PDF rasterized");

    let config = &state.config().ocr;
    let aggregator = MultiPassAggregator::new(
        state.recognizer(),
        &config.language,
        config.passes.clone(),
    );
    let corpus = aggregator.pool(&pages).await?;
    tracing::debug!(lines = corpus.len(), "OCR corpus pooled");

    let records = extract_plots(&corpus);
    let total_items = records.len();
    tracing::info!(total_items, pages_processed, "Extraction complete");

    Ok(Json(ProcessResponse {
        success: true,
        records,
        total_items,
        pages_processed,
    }))
}

/// Pull the PDF bytes out of the multipart upload.
async fn read_pdf_field(multipart: &mut Multipart) -> Result<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "pdf" || name == "file" {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;
            return Ok(data.to_vec());
        }
    }

    tracing::warn!("No PDF field found in multipart upload");
    Err(AppError::MissingFile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ocr::Recognizer;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "test-boundary-7d93b";

    fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn minimal_pdf() -> Vec<u8> {
        b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << >> >>
endobj
4 0 obj
<< /Length 0 >>
stream
endstream
endobj
xref
0 5
0000000000 65535 f
0000000009 00000 n
0000000058 00000 n
0000000115 00000 n
0000000226 00000 n
trailer
<< /Size 5 /Root 1 0 R >>
startxref
276
%%EOF"
        .to_vec()
    }

    fn app(recognizer: Arc<dyn Recognizer>) -> Router {
        let state = AppState::new(Config::default(), recognizer);
        router(Config::default().max_upload_bytes()).with_state(state)
    }

    fn scripted(responses: Vec<std::result::Result<String, String>>) -> Arc<dyn Recognizer> {
        Arc::new(crate::ocr::ScriptedRecognizer {
            available: true,
            script: std::sync::Mutex::new(responses),
        })
    }

    async fn send(app: Router, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/process-pdf")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_process_pdf_happy_path() {
        let recognizer = scripted(vec![
            Ok("Lote 01 - 1.343,10 m²\nruído".to_string()),
            Ok("01    1.343,10 m²\n2.000,00 m²".to_string()),
            Ok("Lote 02 - 980,45 m²".to_string()),
        ]);

        let body = multipart_body("pdf", "planta.pdf", &minimal_pdf());
        let (status, json) = send(app(recognizer), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["pages_processed"], 1);
        // Lote 01 (deduplicated), area-only 2.000,00 numbered 002, Lote 02
        assert_eq!(json["total_items"], 3);
        assert_eq!(json["records"][0]["identifier"], "001");
        assert_eq!(json["records"][1]["identifier"], "002");
        assert_eq!(json["records"][1]["area"], 2000.0);
        assert_eq!(json["records"][2]["identifier"], "002");
    }

    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let recognizer = scripted(vec![]);
        let body = multipart_body("other", "planta.pdf", &minimal_pdf());
        let (status, json) = send(app(recognizer), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Nenhum arquivo PDF enviado");
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_rejected() {
        let recognizer = scripted(vec![]);
        let body = multipart_body("pdf", "planta.pdf", b"not a pdf at all");
        let (status, _json) = send(app(recognizer), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
