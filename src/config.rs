//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione della conversione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di conversione
//! - Fornisce validazione dei parametri di input
//! - Fornisce valori di default che riproducono il comportamento di riferimento
//!
//! ## Parametri di configurazione:
//! - `standard_quality`: Qualità WebP per immagini normali (0-100, default: 75)
//! - `high_quality`: Qualità WebP per thumbnail/immagini grandi (0-100, default: 85)
//! - `workers`: Numero di conversioni parallele (default: 4)
//! - `compression_method`: Metodo di compressione libwebp (0-6, default: 6 = il più lento)
//! - `json_output`: Eventi JSON su stdout invece di log e progress bar
//! - `show_progress`: Mostra la progress bar (ignorato in modalità JSON)
//!
//! Non esiste un file di configurazione: i valori arrivano dai default o
//! dagli argomenti della command line.
//!
//! ## Esempio:
//! ```rust
//! use webp_batch_converter::Config;
//!
//! let config = Config {
//!     workers: 8,
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! ```

use crate::quality::{QualitySettings, DEFAULT_HIGH_QUALITY, DEFAULT_STANDARD_QUALITY};
use anyhow::Result;
use serde::Serialize;

/// Name of the output directory created inside the input root
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "Processed_Images";

/// Highest-effort libwebp compression method
pub const MAX_COMPRESSION_METHOD: u8 = 6;

/// Configuration for a conversion run
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// WebP quality for regular images (0-100)
    pub standard_quality: u8,
    /// WebP quality for thumbnails and large images (0-100)
    pub high_quality: u8,
    /// Number of parallel workers
    pub workers: usize,
    /// libwebp compression method (0 = fastest, 6 = smallest output)
    pub compression_method: u8,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
    /// Draw a progress bar on the terminal
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            standard_quality: DEFAULT_STANDARD_QUALITY,
            high_quality: DEFAULT_HIGH_QUALITY,
            workers: 4,
            compression_method: MAX_COMPRESSION_METHOD,
            json_output: false,
            show_progress: true,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.standard_quality > 100 {
            return Err(anyhow::anyhow!("Standard quality must be between 0 and 100"));
        }

        if self.high_quality > 100 {
            return Err(anyhow::anyhow!("High quality must be between 0 and 100"));
        }

        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        if self.compression_method > MAX_COMPRESSION_METHOD {
            return Err(anyhow::anyhow!(
                "Compression method must be between 0 and {}",
                MAX_COMPRESSION_METHOD
            ));
        }

        Ok(())
    }

    pub fn quality_settings(&self) -> QualitySettings {
        QualitySettings::new(self.standard_quality, self.high_quality)
    }
}
