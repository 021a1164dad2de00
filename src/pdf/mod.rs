//! PDF Module
//!
//! Rasterizes uploaded survey PDFs into page images for OCR via MuPDF.

mod rasterizer;

pub use rasterizer::{PageImage, Rasterizer, RasterizeError};
