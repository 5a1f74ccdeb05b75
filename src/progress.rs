//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce la progress bar e le statistiche di conversione.
//!
//! ## Responsabilità:
//! - Progress bar visuale con `indicatif` per feedback real-time
//! - Tracking statistiche (file convertiti, falliti, byte prima/dopo)
//! - Calcolo della riduzione complessiva
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [=========>------------------------------] 12/48 (25%) [OK] banner.png: 62.3% smaller
//! ```
//!
//! ## Esempio:
//! ```rust
//! use webp_batch_converter::progress::{ConversionStats, ProgressManager};
//!
//! let progress = ProgressManager::new(2, false);
//! let mut stats = ConversionStats::new();
//!
//! stats.add_converted(1000, 400);
//! progress.update("[OK] a.png");
//! stats.add_failed();
//! progress.update("[ERROR] b.png");
//!
//! progress.finish(&stats.format_summary());
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages the terminal progress bar
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; a hidden one when `visible` is false
    pub fn new(total_files: u64, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// Statistics tracker for conversion results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConversionStats {
    pub files_converted: usize,
    pub errors: usize,
    pub total_original_size: u64,
    pub total_output_size: u64,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_converted(&mut self, original_size: u64, output_size: u64) {
        self.files_converted += 1;
        self.total_original_size += original_size;
        self.total_output_size += output_size;
    }

    pub fn add_failed(&mut self) {
        self.errors += 1;
    }

    pub fn files_processed(&self) -> usize {
        self.files_converted + self.errors
    }

    /// Byte risparmiati (mai negativo, anche se qualche output è più grande)
    pub fn bytes_saved(&self) -> u64 {
        self.total_original_size.saturating_sub(self.total_output_size)
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_output_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Converted: {} | Errors: {} | {} → {} ({:.1}% smaller)",
            self.files_processed(),
            self.files_converted,
            self.errors,
            FileManager::format_size(self.total_original_size),
            FileManager::format_size(self.total_output_size),
            self.overall_reduction_percent()
        )
    }
}
