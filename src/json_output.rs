//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'uso programmatico.
//!
//! ## Responsabilità:
//! - Emette un messaggio JSON per riga su stdout (`--json`)
//! - Riusa `ConvertedImage` e `RunSummary` senza duplicarne i campi
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio della conversione (directory, file trovati, configurazione)
//! - `skipped`: Output già aggiornato, file non schedulato
//! - `file_complete`: Fine conversione di un file (successo o errore)
//! - `complete`: Fine esecuzione con il riepilogo
//! - `error`: Errore fatale

use crate::config::Config;
use crate::converter::{ConversionResult, ConvertedImage};
use crate::optimizer::scheduler::RunSummary;
use serde::Serialize;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Inizio del processo di conversione
    Start {
        input_dir: PathBuf,
        output_dir: PathBuf,
        total_files: usize,
        config: Config,
    },

    /// Output già aggiornato
    Skipped { input: PathBuf, output: PathBuf },

    /// Fine conversione di un file specifico
    FileComplete {
        input: PathBuf,
        output: PathBuf,
        succeeded: bool,
        #[serde(flatten)]
        converted: Option<ConvertedImage>,
        reduction_percent: Option<f64>,
        error: Option<String>,
    },

    /// Processo completato
    Complete {
        #[serde(flatten)]
        summary: RunSummary,
        bytes_saved: u64,
        average_reduction: f64,
        duration_seconds: f64,
    },

    /// Errore generale
    Error {
        message: String,
        details: Option<String>,
    },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(input_dir: PathBuf, output_dir: PathBuf, total_files: usize, config: Config) -> Self {
        Self::Start {
            input_dir,
            output_dir,
            total_files,
            config,
        }
    }

    pub fn skipped(input: PathBuf, output: PathBuf) -> Self {
        Self::Skipped { input, output }
    }

    /// Crea un messaggio di completamento file
    pub fn file_complete(input: PathBuf, output: PathBuf, result: &ConversionResult) -> Self {
        match result {
            ConversionResult::Converted(converted) => Self::FileComplete {
                input,
                output,
                succeeded: true,
                reduction_percent: Some(converted.reduction_percent()),
                converted: Some(converted.clone()),
                error: None,
            },
            ConversionResult::Failed { cause } => Self::FileComplete {
                input,
                output,
                succeeded: false,
                converted: None,
                reduction_percent: None,
                error: Some(cause.clone()),
            },
        }
    }

    pub fn complete(summary: RunSummary, bytes_saved: u64, average_reduction: f64, duration_seconds: f64) -> Self {
        Self::Complete {
            summary,
            bytes_saved,
            average_reduction,
            duration_seconds,
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityTier;
    use serde_json::Value;

    #[test]
    fn test_file_complete_success_fields() {
        let result = ConversionResult::Converted(ConvertedImage {
            original_size: 1000,
            output_size: 400,
            tier: QualityTier::High,
            quality: 85,
            has_transparency: true,
        });
        let message = JsonMessage::file_complete("in/a.png".into(), "out/a.webp".into(), &result);
        let value: Value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "file_complete");
        assert_eq!(value["succeeded"], true);
        assert_eq!(value["original_size"], 1000);
        assert_eq!(value["output_size"], 400);
        assert_eq!(value["tier"], "high");
        assert_eq!(value["quality"], 85);
        assert_eq!(value["has_transparency"], true);
        assert!((value["reduction_percent"].as_f64().unwrap() - 60.0).abs() < 1e-9);
        assert!(value["error"].is_null());
    }

    #[test]
    fn test_file_complete_failure_fields() {
        let result = ConversionResult::failed("Image decoding error: bad header");
        let message = JsonMessage::file_complete("in/b.jpg".into(), "out/b.webp".into(), &result);
        let value: Value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["succeeded"], false);
        assert_eq!(value["error"], "Image decoding error: bad header");
        assert!(value.get("quality").is_none());
    }

    #[test]
    fn test_complete_flattens_summary() {
        let summary = RunSummary {
            discovered: 5,
            skipped: 1,
            total: 4,
            successful: 3,
            cancelled: 0,
        };
        let value = serde_json::to_value(JsonMessage::complete(summary, 2048, 55.5, 1.25)).unwrap();

        assert_eq!(value["type"], "complete");
        assert_eq!(value["successful"], 3);
        assert_eq!(value["total"], 4);
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["bytes_saved"], 2048);
    }

    #[test]
    fn test_start_embeds_config() {
        let message = JsonMessage::start("in".into(), "in/Processed_Images".into(), 7, Config::default());
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "start");
        assert_eq!(value["total_files"], 7);
        assert_eq!(value["config"]["standard_quality"], 75);
        assert_eq!(value["config"]["workers"], 4);
    }
}
