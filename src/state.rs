//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::ocr::Recognizer;
use crate::pdf::Rasterizer;

/// Shared application state
///
/// The recognizer is held behind a trait object so handler tests can
/// substitute a scripted recognizer for the Tesseract CLI.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    rasterizer: Rasterizer,
    recognizer: Arc<dyn Recognizer>,
}

impl AppState {
    pub fn new(config: Config, recognizer: Arc<dyn Recognizer>) -> Self {
        let rasterizer = Rasterizer::new(config.ocr.dpi);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                rasterizer,
                recognizer,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.inner.rasterizer
    }

    pub fn recognizer(&self) -> Arc<dyn Recognizer> {
        self.inner.recognizer.clone()
    }
}
