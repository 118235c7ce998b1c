//! Core decision logic: classification, scoring, aggregation, triggering

mod aggregate;
mod classifier;
mod complexity;
mod extract;
mod settings;
mod trigger;
mod types;

pub use aggregate::{analyze_task, CacheSnapshot, TaskAnalysis, AUX_FILENAMES};
pub use classifier::{classify, Category, Classification};
pub use complexity::{complexity_score, is_eligible, relevance_score, LARGE_FILE_THRESHOLD};
pub use extract::{extract_file_blocks, FileBlock};
pub use settings::{OptimizationSettings, RemoteSettings};
pub use trigger::{TriggerDecision, TriggerEngine, TriggerReason, TriggerState};
pub use types::{CondenseMethod, CondensedFile, OptimizationJob};
