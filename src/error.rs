//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore delle singole conversioni.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` per categorizzare gli errori di una conversione
//! - Fornisce messaggi descrittivi, riportati come causa nel `ConversionResult`
//! - Integra con `thiserror` per la conversione automatica degli errori standard
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (lettura input, scrittura output, permessi, disco pieno)
//! - `Image`: Input non decodificabile (file corrotto, formato non valido)
//! - `Encode`: Errore dell'encoder WebP
//! - `UnsupportedFormat`: Formato rilevato non tra quelli supportati
//! - `InvalidPath`: Path senza nome file o senza directory padre
//!
//! Gli errori di questo tipo non escono mai dal `Converter`: vengono
//! trasformati in `ConversionResult::Failed`. Gli errori fatali dell'intera
//! esecuzione (directory radice mancante, configurazione invalida) passano
//! invece per `anyhow`.

/// Task-local conversion errors
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("WebP encoding error: {0}")]
    Encode(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<tempfile::PersistError> for ConvertError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
