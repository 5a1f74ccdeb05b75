//! # Progress Tracking Module
//!
//! Tracker thread-safe condiviso dai task: contiene il conteggio di
//! successi/totale e rende ogni risultato su console (log + progress bar)
//! oppure come evento JSON.

use crate::{
    config::Config,
    converter::ConversionResult,
    file_manager::FileManager,
    json_output::JsonMessage,
    optimizer::task_optimizer::ImageTask,
    progress::{ConversionStats, ProgressManager},
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Tracker progress unificato
#[derive(Clone)]
pub struct ProgressTracker {
    json_output: bool,
    completed: Arc<Mutex<usize>>,
    successful: Arc<Mutex<usize>>,
    stats: Arc<Mutex<ConversionStats>>,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker
    pub fn new(total_tasks: usize, config: &Config) -> Self {
        let visible = config.show_progress && !config.json_output;
        Self {
            json_output: config.json_output,
            completed: Arc::new(Mutex::new(0)),
            successful: Arc::new(Mutex::new(0)),
            stats: Arc::new(Mutex::new(ConversionStats::new())),
            progress_manager: ProgressManager::new(total_tasks as u64, visible),
        }
    }

    /// Segnala un file saltato perché l'output è già aggiornato
    pub fn report_skipped(config: &Config, input: &Path, output: &Path) {
        if config.json_output {
            JsonMessage::skipped(input.to_path_buf(), output.to_path_buf()).emit();
        } else {
            debug!(
                "[SKIP] Already processed: {}",
                input.file_name().unwrap_or_default().to_string_lossy()
            );
        }
    }

    /// Registra il completamento di un task: conteggi, log, JSON e progress bar
    pub async fn handle_file_completion(&self, task: &ImageTask, result: &ConversionResult) {
        {
            let mut completed = self.completed.lock().await;
            *completed += 1;
        }

        let name = task.display_name();

        match result {
            ConversionResult::Converted(converted) => {
                {
                    let mut successful = self.successful.lock().await;
                    *successful += 1;
                }
                self.stats
                    .lock()
                    .await
                    .add_converted(converted.original_size, converted.output_size);

                if !self.json_output {
                    let transparency = if converted.has_transparency {
                        "with transparency"
                    } else {
                        "without transparency"
                    };
                    info!(
                        "[OK] Converted: {} | Quality: {} ({}), {} | Size: {} → {} ({:.1}% smaller)",
                        name,
                        converted.quality,
                        converted.tier.description(),
                        transparency,
                        FileManager::format_size(converted.original_size),
                        FileManager::format_size(converted.output_size),
                        converted.reduction_percent()
                    );
                }

                self.progress_manager.update(&format!(
                    "[OK] {}: {:.1}% smaller",
                    name,
                    converted.reduction_percent()
                ));
            }
            ConversionResult::Failed { cause } => {
                self.stats.lock().await.add_failed();

                if !self.json_output {
                    warn!("[ERROR] Failed to convert {}: {}", task.input.display(), cause);
                }

                self.progress_manager.update(&format!("[ERROR] {}", name));
            }
        }

        if self.json_output {
            JsonMessage::file_complete(task.input.clone(), task.output.clone(), result).emit();
        }
    }

    /// Numero di task completati (successo o errore)
    pub async fn completed(&self) -> usize {
        *self.completed.lock().await
    }

    pub async fn successful(&self) -> usize {
        *self.successful.lock().await
    }

    /// Ottieni statistiche per report finale
    pub async fn get_stats(&self) -> ConversionStats {
        self.stats.lock().await.clone()
    }

    /// Finalizza progress bar
    pub fn finish(&self, summary: &str) {
        self.progress_manager.finish(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConvertedImage;
    use crate::quality::QualityTier;
    use std::path::PathBuf;

    fn quiet_config() -> Config {
        Config {
            show_progress: false,
            ..Default::default()
        }
    }

    fn task(name: &str) -> ImageTask {
        ImageTask::new(PathBuf::from(format!("/in/{}", name)), PathBuf::from("/out/x.webp"))
    }

    fn converted(original_size: u64, output_size: u64) -> ConversionResult {
        ConversionResult::Converted(ConvertedImage {
            original_size,
            output_size,
            tier: QualityTier::Standard,
            quality: 75,
            has_transparency: false,
        })
    }

    #[tokio::test]
    async fn test_tally_counts_every_completion_once() {
        let tracker = ProgressTracker::new(3, &quiet_config());

        tracker.handle_file_completion(&task("a.png"), &converted(1000, 300)).await;
        tracker
            .handle_file_completion(&task("b.png"), &ConversionResult::failed("corrupt"))
            .await;
        tracker.handle_file_completion(&task("c.png"), &converted(500, 200)).await;

        assert_eq!(tracker.completed().await, 3);
        assert_eq!(tracker.successful().await, 2);

        let stats = tracker.get_stats().await;
        assert_eq!(stats.files_converted, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.bytes_saved(), 1000);
        tracker.finish(&stats.format_summary());
    }

    #[tokio::test]
    async fn test_concurrent_completions() {
        let tracker = ProgressTracker::new(64, &quiet_config());
        let mut handles = Vec::new();

        for i in 0..64 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                let result = if i % 4 == 0 {
                    ConversionResult::failed("boom")
                } else {
                    converted(10, 5)
                };
                tracker.handle_file_completion(&task("img.png"), &result).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(tracker.completed().await, 64);
        assert_eq!(tracker.successful().await, 48);
    }
}
