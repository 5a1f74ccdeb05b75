//! # Task Optimizer Module
//!
//! Worker per la conversione di un singolo `ImageTask`.
//! La conversione è CPU-bound e bloccante: gira su `spawn_blocking`, così i
//! thread del runtime restano liberi per lo scheduler.

use crate::codec::{ImageCodec, WebpCodec};
use crate::converter::{ConversionResult, Converter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

/// One input → output conversion unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ImageTask {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self { input, output }
    }

    /// Nome file per i messaggi di progress
    pub fn display_name(&self) -> String {
        self.input
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

/// Worker condiviso tra i task: il converter è dietro un `Arc`
pub struct TaskOptimizer<C = WebpCodec> {
    converter: Arc<Converter<C>>,
}

impl<C> Clone for TaskOptimizer<C> {
    fn clone(&self) -> Self {
        Self {
            converter: Arc::clone(&self.converter),
        }
    }
}

impl<C: ImageCodec + 'static> TaskOptimizer<C> {
    pub fn new(converter: Converter<C>) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    /// Converte il task; un panic del codec diventa un fallimento strutturato.
    pub async fn process(&self, task: &ImageTask) -> ConversionResult {
        let converter = Arc::clone(&self.converter);
        let input = task.input.clone();
        let output = task.output.clone();

        match tokio::task::spawn_blocking(move || converter.convert(&input, &output)).await {
            Ok(result) => result,
            Err(e) => {
                error!("Conversion task for {} did not complete: {}", task.input.display(), e);
                ConversionResult::failed(format!("Conversion task did not complete: {}", e))
            }
        }
    }
}
