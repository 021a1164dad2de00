//! PDF Rasterizer
//!
//! Converts an uploaded PDF into an ordered sequence of PNG page images at a
//! fixed resolution (300 DPI by default, high enough for small-font survey
//! tables). Rendering happens inside one `spawn_blocking` closure because
//! MuPDF types are not `Send`.

use std::io::Cursor;

use image::DynamicImage;
use mupdf::{Colorspace, Document, Matrix};

/// Rasterization error types
#[derive(Debug, thiserror::Error)]
pub enum RasterizeError {
    #[error("Failed to open PDF: {0}")]
    Open(String),

    #[error("PDF contains no pages")]
    Empty,

    #[error("Failed to render page {page}: {message}")]
    Render { page: usize, message: String },

    #[error("Failed to encode page {page} image: {message}")]
    Encode { page: usize, message: String },
}

/// One rasterized page, ready for OCR.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Page number (1-indexed).
    pub number: usize,
    /// PNG-encoded page image.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Rasterizes PDFs at a fixed DPI.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    dpi: u32,
}

impl Rasterizer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Render every page of `pdf` to a PNG image, in page order.
    pub async fn rasterize(&self, pdf: Vec<u8>) -> Result<Vec<PageImage>, RasterizeError> {
        let dpi = self.dpi;

        tokio::task::spawn_blocking(move || rasterize_blocking(&pdf, dpi))
            .await
            .map_err(|e| RasterizeError::Render {
                page: 0,
                message: format!("Task join error: {}", e),
            })?
    }
}

fn rasterize_blocking(pdf: &[u8], dpi: u32) -> Result<Vec<PageImage>, RasterizeError> {
    let document = Document::from_bytes(pdf, "application/pdf")
        .map_err(|e| RasterizeError::Open(e.to_string()))?;

    let page_count = document
        .page_count()
        .map_err(|e| RasterizeError::Open(e.to_string()))? as usize;
    if page_count == 0 {
        return Err(RasterizeError::Empty);
    }

    // PDF user space is 72 units per inch
    let scale = dpi as f32 / 72.0;
    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut pages = Vec::with_capacity(page_count);

    for index in 0..page_count {
        let number = index + 1;

        let page = document
            .load_page(index as i32)
            .map_err(|e| RasterizeError::Render {
                page: number,
                message: e.to_string(),
            })?;

        let pixmap = page
            .to_pixmap(&matrix, &colorspace, true, false)
            .map_err(|e| RasterizeError::Render {
                page: number,
                message: e.to_string(),
            })?;

        let (png, width, height) = encode_pixmap_png(&pixmap, number)?;

        tracing::debug!(page = number, width, height, "Rasterized page");

        pages.push(PageImage {
            number,
            png,
            width,
            height,
        });
    }

    Ok(pages)
}

/// Convert a MuPDF pixmap to an RGBA buffer and encode it as PNG.
fn encode_pixmap_png(
    pixmap: &mupdf::Pixmap,
    page: usize,
) -> Result<(Vec<u8>, u32, u32), RasterizeError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgba_buffer = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            let a = if n >= 4 {
                samples.get(offset + 3).copied().unwrap_or(255)
            } else {
                255
            };
            rgba_buffer.extend_from_slice(&[r, g, b, a]);
        }
    }

    let img = image::RgbaImage::from_raw(width, height, rgba_buffer).ok_or_else(|| {
        RasterizeError::Encode {
            page,
            message: "Failed to create image buffer".to_string(),
        }
    })?;

    let mut output = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| RasterizeError::Encode {
            page,
            message: e.to_string(),
        })?;

    Ok((output, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal single-page PDF that MuPDF can parse
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

    #[tokio::test]
    async fn test_rasterize_minimal_pdf() {
        let rasterizer = Rasterizer::new(300);
        let pages = rasterizer.rasterize(minimal_pdf()).await.unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        // 612pt x 792pt page at 300 DPI, allowing for pixmap rounding
        assert!((pages[0].width as i64 - 2550).abs() <= 1);
        assert!((pages[0].height as i64 - 3300).abs() <= 1);
        assert!(pages[0].png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn test_rasterize_garbage_is_an_open_error() {
        let rasterizer = Rasterizer::new(300);
        let result = rasterizer.rasterize(b"not a pdf".to_vec()).await;
        assert!(matches!(result, Err(RasterizeError::Open(_))));
    }
}
