//! # Optimizer Module
//!
//! Separa le responsabilità della conversione batch in sottomoduli:
//! - `scheduler`: Orchestratore principale (scansione, skip, dispatch)
//! - `task_optimizer`: Worker per singoli file
//! - `progress_tracker`: Conteggi thread-safe e output console/JSON
//! - `path_resolver`: Calcolo dei path di output e controllo di freschezza

pub mod scheduler;
pub mod task_optimizer;
pub mod progress_tracker;
pub mod path_resolver;

pub use scheduler::{RunSummary, Scheduler};
pub use task_optimizer::{ImageTask, TaskOptimizer};
pub use progress_tracker::ProgressTracker;
pub use path_resolver::PathResolver;
