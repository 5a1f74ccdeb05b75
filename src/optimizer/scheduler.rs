//! # Scheduler
//!
//! Orchestratore principale: scansione, pianificazione e dispatch parallelo.
//!
//! ## Flusso:
//! 1. `FileManager::find_image_files()` trova le immagini (una sola volta,
//!    prima del dispatch). Radice mancante = errore fatale.
//! 2. Pianificazione: path di output, creazione directory, skip dei file il
//!    cui output è più recente dell'input.
//! 3. Dispatch su un pool limitato (`Semaphore` con `workers` permessi): il
//!    permesso resta al task fino alla fine della conversione.
//! 4. Ogni completamento, in qualsiasi ordine, passa dal `ProgressTracker`.
//! 5. Il `RunSummary` viene restituito quando tutti i task sono terminati.
//!
//! ## Cancellazione:
//! Con `with_cancellation()` lo scheduler smette di avviare nuovi task alla
//! ricezione del segnale di stop; quelli in corso vengono completati.

use crate::{
    codec::{ImageCodec, WebpCodec},
    config::Config,
    converter::{ConversionResult, Converter},
    file_manager::FileManager,
    json_output::JsonMessage,
    optimizer::{
        path_resolver::PathResolver,
        progress_tracker::ProgressTracker,
        task_optimizer::{ImageTask, TaskOptimizer},
    },
    progress::ConversionStats,
};
use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, Semaphore};
use tracing::{error, info, warn};

/// Totals of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Supported images found under the root
    pub discovered: usize,
    /// Images whose output was already up to date
    pub skipped: usize,
    /// Dispatched tasks that completed (success or failure)
    pub total: usize,
    /// Dispatched tasks that produced an output
    pub successful: usize,
    /// Planned tasks never dispatched because of a stop signal
    pub cancelled: usize,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.total - self.successful
    }
}

/// Piano di lavoro calcolato prima del dispatch
struct ConversionPlan {
    tasks: Vec<ImageTask>,
    skipped: usize,
    /// Input che producono lo stesso path di output di un input precedente
    collisions: usize,
}

/// Orchestratore della conversione
pub struct Scheduler<C = WebpCodec> {
    config: Config,
    task_optimizer: TaskOptimizer<C>,
    stop_receiver: Option<broadcast::Receiver<()>>,
}

impl Scheduler<WebpCodec> {
    /// Scheduler con il codec libwebp
    pub fn new(config: Config) -> Result<Self> {
        Self::with_codec(config, WebpCodec)
    }

    pub fn create_cancellation_channel(capacity: usize) -> (broadcast::Sender<()>, broadcast::Receiver<()>) {
        broadcast::channel(capacity)
    }
}

impl<C: ImageCodec + 'static> Scheduler<C> {
    pub fn with_codec(config: Config, codec: C) -> Result<Self> {
        config.validate()?;
        let task_optimizer = TaskOptimizer::new(Converter::from_config(codec, &config));

        Ok(Self {
            config,
            task_optimizer,
            stop_receiver: None,
        })
    }

    /// Abilita la cancellazione cooperativa tramite broadcast channel
    pub fn with_cancellation(mut self, stop_receiver: broadcast::Receiver<()>) -> Self {
        self.stop_receiver = Some(stop_receiver);
        self
    }

    fn should_stop(&mut self) -> bool {
        if let Some(ref mut receiver) = self.stop_receiver {
            match receiver.try_recv() {
                Ok(_) => return true,
                Err(broadcast::error::TryRecvError::Empty) => return false,
                // Segnale inviato ma perso: equivale a stop
                Err(broadcast::error::TryRecvError::Lagged(_)) => return true,
                // Sender droppato: si continua
                Err(broadcast::error::TryRecvError::Closed) => return false,
            }
        }
        false
    }

    /// Converte tutte le immagini sotto `root_dir` in `output_base`.
    pub async fn run(&mut self, root_dir: &Path, output_base: &Path) -> Result<RunSummary> {
        let start_time = Instant::now();

        let files = FileManager::find_image_files(root_dir, Some(output_base))?;
        self.emit_start_message(root_dir, output_base, files.len());

        let discovered = files.len();
        let plan = self.plan_tasks(root_dir, output_base, files).await?;
        if plan.collisions > 0 {
            warn!(
                "{} images share an output path with another image: only one output per path survives",
                plan.collisions
            );
        }

        let tracker = ProgressTracker::new(plan.tasks.len(), &self.config);
        let cancelled = self.dispatch(plan.tasks, &tracker).await?;

        let summary = RunSummary {
            discovered,
            skipped: plan.skipped,
            total: tracker.completed().await,
            successful: tracker.successful().await,
            cancelled,
        };

        let stats = tracker.get_stats().await;
        tracker.finish(&stats.format_summary());
        self.print_final_stats(&summary, &stats, output_base, start_time.elapsed().as_secs_f64());

        Ok(summary)
    }

    /// Invia messaggio di inizio
    fn emit_start_message(&self, root_dir: &Path, output_base: &Path, found: usize) {
        if self.config.json_output {
            JsonMessage::start(
                root_dir.to_path_buf(),
                output_base.to_path_buf(),
                found,
                self.config.clone(),
            )
            .emit();
        } else {
            info!("Input directory: {}", root_dir.display());
            info!("Output directory: {}", output_base.display());
            info!(
                "Quality: {} standard, {} for thumbnails/large images | Workers: {}",
                self.config.standard_quality, self.config.high_quality, self.config.workers
            );
            info!("Found {} images to process (GIFs are ignored)", found);
        }
    }

    /// Calcola output, crea le directory e scarta i file già aggiornati
    async fn plan_tasks(&self, root_dir: &Path, output_base: &Path, files: Vec<PathBuf>) -> Result<ConversionPlan> {
        let mut tasks = Vec::with_capacity(files.len());
        let mut skipped = 0;
        let mut collisions = 0;
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(files.len());

        for input in files {
            let output = PathResolver::get_output_path(&input, root_dir, output_base)?;

            // Es. a.jpg e a.png nella stessa directory -> a.webp
            if let Some(previous) = claimed.get(&output) {
                collisions += 1;
                warn!(
                    "{} and {} both convert to {}",
                    previous.display(),
                    input.display(),
                    output.display()
                );
            } else {
                claimed.insert(output.clone(), input.clone());
            }

            // Se fallisce qui, fallirà la scrittura del task: errore locale
            if let Err(e) = PathResolver::ensure_parent_dirs(&output).await {
                warn!("{}", e);
            }

            if PathResolver::is_up_to_date(&input, &output).await {
                skipped += 1;
                ProgressTracker::report_skipped(&self.config, &input, &output);
                continue;
            }

            tasks.push(ImageTask::new(input, output));
        }

        Ok(ConversionPlan {
            tasks,
            skipped,
            collisions,
        })
    }

    /// Avvia i task con al massimo `workers` conversioni contemporanee.
    ///
    /// Restituisce il numero di task non avviati per cancellazione.
    async fn dispatch(&mut self, tasks: Vec<ImageTask>, tracker: &ProgressTracker) -> Result<usize> {
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut spawned = Vec::with_capacity(tasks.len());
        let mut handles = Vec::with_capacity(tasks.len());
        let mut cancelled = 0;

        let mut remaining = tasks.into_iter();
        while let Some(task) = remaining.next() {
            let permit = semaphore.clone().acquire_owned().await?;

            if self.should_stop() {
                cancelled = 1 + remaining.len();
                warn!("Stop requested: {} images will not be converted", cancelled);
                break;
            }

            let task_optimizer = self.task_optimizer.clone();
            let tracker_clone = tracker.clone();
            let spawned_task = task.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit; // rilasciato a fine conversione

                let result = task_optimizer.process(&spawned_task).await;
                tracker_clone.handle_file_completion(&spawned_task, &result).await;
            });

            spawned.push(task);
            handles.push(handle);
        }

        // Aspetta tutti i task: nessuno viene abbandonato
        let outcomes = join_all(handles).await;
        for (task, outcome) in spawned.iter().zip(outcomes) {
            if let Err(e) = outcome {
                error!("Task for {} failed: {}", task.input.display(), e);
                let result = ConversionResult::failed(format!("Task failed: {}", e));
                tracker.handle_file_completion(task, &result).await;
            }
        }

        Ok(cancelled)
    }

    /// Stampa statistiche finali
    fn print_final_stats(&self, summary: &RunSummary, stats: &ConversionStats, output_base: &Path, duration: f64) {
        if self.config.json_output {
            JsonMessage::complete(
                *summary,
                stats.bytes_saved(),
                stats.overall_reduction_percent(),
                duration,
            )
            .emit();
            return;
        }

        info!("=== Conversion complete ===");
        info!("Successfully converted: {}/{} images", summary.successful, summary.total);
        if summary.skipped > 0 {
            info!("Skipped (already processed): {}", summary.skipped);
        }
        if summary.cancelled > 0 {
            info!("Not started (stopped): {}", summary.cancelled);
        }
        info!(
            "Size: {} → {} ({:.1}% smaller)",
            FileManager::format_size(stats.total_original_size),
            FileManager::format_size(stats.total_output_size),
            stats.overall_reduction_percent()
        );
        info!("Output location: {}", output_base.display());
        info!("Duration: {:.2}s", duration);

        if summary.successful < summary.total {
            warn!("Some images failed to convert. Check the logs above for details.");
        }
    }
}
