//! # WebP Batch Converter Library
//!
//! Modulo principale della libreria: espone le API pubbliche del convertitore.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Parametri di esecuzione e validazione
//! - `error`: Errori di conversione per singolo file
//! - `quality`: Politica di scelta della qualità (standard / alta)
//! - `codec`: Decodifica immagini e codifica WebP
//! - `converter`: Conversione di un singolo file con scrittura atomica
//! - `file_manager`: Discovery delle immagini e utility sui file
//! - `optimizer`: Scheduler, worker e tracking del progresso
//! - `progress`: Progress bar e statistiche
//! - `json_output`: Eventi JSON per integrazioni esterne
//!
//! ## Utilizzo:
//! ```no_run
//! use webp_batch_converter::{Config, Scheduler};
//! use std::path::Path;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut scheduler = Scheduler::new(Config::default())?;
//! let summary = scheduler
//!     .run(Path::new("photos"), Path::new("photos/Processed_Images"))
//!     .await?;
//! println!("{}/{}", summary.successful, summary.total);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod converter;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod optimizer;
pub mod progress;
pub mod quality;

pub use codec::{ImageCodec, WebpCodec};
pub use config::Config;
pub use converter::{ConversionResult, Converter};
pub use error::ConvertError;
pub use optimizer::{RunSummary, Scheduler};
pub use quality::QualityTier;
