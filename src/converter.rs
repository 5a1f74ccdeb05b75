//! # Converter Module
//!
//! Converte un singolo file immagine in WebP.
//!
//! ## Pipeline:
//! 1. **Decodifica** tramite `ImageCodec` (dimensioni + trasparenza)
//! 2. **Qualità**: `QualityTier::decide()` su nome file e dimensioni
//! 3. **Normalizzazione**: RGBA se c'è trasparenza, altrimenti RGB opaco
//! 4. **Encoding** WebP lossy, metodo di compressione configurato (default 6)
//! 5. **Scrittura atomica**: file temporaneo nella directory di destinazione,
//!    poi rename sul path finale
//! 6. **Statistiche**: dimensioni lette dal filesystem, percentuale di riduzione
//!
//! ## Gestione errori:
//! `convert()` non fallisce mai: qualsiasi errore (input corrotto, encoder,
//! permessi, disco pieno) diventa `ConversionResult::Failed` con la causa.
//! In caso di errore non resta nessun file parziale: il file temporaneo viene
//! rimosso quando esce di scope.
//!
//! ## Esempio:
//! ```rust,no_run
//! use std::path::Path;
//! use webp_batch_converter::converter::Converter;
//!
//! let converter = Converter::with_defaults();
//! let result = converter.convert(Path::new("in/banner.png"), Path::new("out/banner.webp"));
//! println!("succeeded: {}", result.succeeded());
//! ```

use crate::codec::{EncodeSettings, ImageCodec, WebpCodec};
use crate::config::{Config, MAX_COMPRESSION_METHOD};
use crate::error::ConvertError;
use crate::file_manager::FileManager;
use crate::quality::{QualitySettings, QualityTier};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Statistics of a successful conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedImage {
    pub original_size: u64,
    pub output_size: u64,
    pub tier: QualityTier,
    pub quality: u8,
    pub has_transparency: bool,
}

impl ConvertedImage {
    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.original_size, self.output_size)
    }
}

/// Outcome of one conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Converted(ConvertedImage),
    Failed { cause: String },
}

impl ConversionResult {
    pub fn failed(cause: impl Into<String>) -> Self {
        Self::Failed { cause: cause.into() }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Converted(_))
    }
}

/// Single-file image to WebP converter
pub struct Converter<C = WebpCodec> {
    codec: C,
    qualities: QualitySettings,
    compression_method: u8,
}

impl Converter<WebpCodec> {
    /// Converter with the libwebp codec and default qualities (75/85, method 6)
    pub fn with_defaults() -> Self {
        Self::new(WebpCodec, QualitySettings::default(), MAX_COMPRESSION_METHOD)
    }
}

impl<C: ImageCodec> Converter<C> {
    pub fn new(codec: C, qualities: QualitySettings, compression_method: u8) -> Self {
        Self {
            codec,
            qualities,
            compression_method,
        }
    }

    pub fn from_config(codec: C, config: &Config) -> Self {
        Self::new(codec, config.quality_settings(), config.compression_method)
    }

    /// Convert `input_path` into a WebP file at `output_path`.
    pub fn convert(&self, input_path: &Path, output_path: &Path) -> ConversionResult {
        match self.try_convert(input_path, output_path) {
            Ok(converted) => ConversionResult::Converted(converted),
            Err(e) => {
                debug!("Conversion of {} failed: {}", input_path.display(), e);
                ConversionResult::failed(e.to_string())
            }
        }
    }

    fn try_convert(&self, input_path: &Path, output_path: &Path) -> Result<ConvertedImage, ConvertError> {
        let file_name = input_path
            .file_name()
            .ok_or_else(|| ConvertError::InvalidPath(input_path.display().to_string()))?
            .to_string_lossy();

        let decoded = self.codec.decode(input_path)?;
        let (width, height) = (decoded.width(), decoded.height());

        let tier = QualityTier::decide(&file_name, width, height);
        let quality = self.qualities.value_for(tier);
        let has_transparency = decoded.has_transparency();

        debug!(
            "{}: {}x{}, {} ({}), transparency: {}",
            file_name,
            width,
            height,
            quality,
            tier.description(),
            has_transparency
        );

        let pixels = decoded.normalize();
        let settings = EncodeSettings {
            quality,
            method: self.compression_method,
        };
        let bytes = self.codec.encode(&pixels, &settings)?;

        Self::write_atomically(output_path, &bytes)?;

        let original_size = std::fs::metadata(input_path)?.len();
        let output_size = std::fs::metadata(output_path)?.len();

        Ok(ConvertedImage {
            original_size,
            output_size,
            tier,
            quality,
            has_transparency,
        })
    }

    /// Scrive su un file temporaneo accanto alla destinazione e lo rinomina.
    fn write_atomically(output_path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
        let parent = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp_file = tempfile::Builder::new()
            .prefix(".webp-partial-")
            .tempfile_in(parent)?;
        temp_file.write_all(bytes)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(output_path)?;
        Ok(())
    }
}
