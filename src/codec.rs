//! # Codec Module
//!
//! Decodifica e codifica delle immagini, isolate dietro il trait `ImageCodec`.
//!
//! ## Responsabilità:
//! - `decode()`: legge un file (JPG, PNG, BMP, TIFF) e produce un `DecodedImage`
//!   con dimensioni e informazioni sulla trasparenza
//! - `encode()`: trasforma un `PixelBuffer` RGB o RGBA in byte WebP lossy
//!
//! ## Implementazioni:
//! - `WebpCodec`: decodifica con il crate `image`, codifica con libwebp
//!   (crate `webp`) per avere controllo su qualità e metodo di compressione
//! - Nei test il trait viene implementato da codec finti per contare le
//!   chiamate concorrenti o simulare errori
//!
//! ## Pipeline immutabile:
//! ```text
//! DecodedImage ──normalize──▶ PixelBuffer (nuovo buffer) ──encode──▶ Vec<u8>
//! ```
//! Il `DecodedImage` non viene mai modificato: la normalizzazione produce
//! sempre un nuovo buffer.

use crate::error::ConvertError;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::path::Path;
use std::sync::Arc;

/// Result of decoding one input file
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// True when the decoded colour type carries alpha.
    ///
    /// Il decoder PNG espande qualsiasi chunk tRNS in un canale alpha: una
    /// palette con indice trasparente risulta trasparente, ma anche un PNG
    /// RGB o in scala di grigi con tRNS (color key) viene trattato come
    /// trasparente e codificato in RGBA.
    pub fn has_transparency(&self) -> bool {
        self.image.color().has_alpha()
    }

    /// Normalizza verso il buffer richiesto dall'encoder.
    ///
    /// Immagini trasparenti diventano RGBA8, tutte le altre (palette, scala di
    /// grigi, 16 bit, float) diventano RGB8 opaco.
    pub fn normalize(&self) -> PixelBuffer {
        if self.has_transparency() {
            PixelBuffer::Rgba(self.image.to_rgba8())
        } else {
            PixelBuffer::Rgb(self.image.to_rgb8())
        }
    }
}

/// 8-bit pixel buffer handed to the encoder
#[derive(Debug, Clone)]
pub enum PixelBuffer {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl PixelBuffer {
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba(_))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Rgb(buffer) => buffer.dimensions(),
            Self::Rgba(buffer) => buffer.dimensions(),
        }
    }
}

/// Encoder parameters for a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    /// Lossy quality (0-100)
    pub quality: u8,
    /// libwebp method (0-6)
    pub method: u8,
}

/// External image codec collaborator
pub trait ImageCodec: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ConvertError>;

    fn encode(&self, pixels: &PixelBuffer, settings: &EncodeSettings) -> Result<Vec<u8>, ConvertError>;
}

impl<T: ImageCodec + ?Sized> ImageCodec for Arc<T> {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ConvertError> {
        (**self).decode(path)
    }

    fn encode(&self, pixels: &PixelBuffer, settings: &EncodeSettings) -> Result<Vec<u8>, ConvertError> {
        (**self).encode(pixels, settings)
    }
}

/// Production codec: `image` for decoding, libwebp for encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl WebpCodec {
    /// Formati accettati in input (GIF escluso)
    fn is_supported_input(format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff
        )
    }
}

impl ImageCodec for WebpCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ConvertError> {
        let reader = image::io::Reader::open(path)?.with_guessed_format()?;

        let format = reader.format().ok_or_else(|| {
            ConvertError::UnsupportedFormat(format!("cannot detect image format of {}", path.display()))
        })?;
        if !Self::is_supported_input(format) {
            return Err(ConvertError::UnsupportedFormat(format!("{:?}", format)));
        }

        // Palette + tRNS arriva già espansa in RGBA
        let image = reader.decode()?;
        Ok(DecodedImage::new(image))
    }

    fn encode(&self, pixels: &PixelBuffer, settings: &EncodeSettings) -> Result<Vec<u8>, ConvertError> {
        let mut config = webp::WebPConfig::new()
            .map_err(|_| ConvertError::Encode("failed to initialise WebP encoder config".to_string()))?;
        config.lossless = 0;
        config.quality = f32::from(settings.quality);
        config.method = i32::from(settings.method);

        let (width, height) = pixels.dimensions();
        let encoder = match pixels {
            PixelBuffer::Rgb(buffer) => webp::Encoder::from_rgb(buffer.as_raw(), width, height),
            PixelBuffer::Rgba(buffer) => webp::Encoder::from_rgba(buffer.as_raw(), width, height),
        };

        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| ConvertError::Encode(format!("{:?}", e)))?;

        Ok(memory.to_vec())
    }
}
