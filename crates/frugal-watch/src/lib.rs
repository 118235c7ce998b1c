//! Watch-and-optimize orchestration: safe conversation mutation, the
//! optimization pipeline, job history, and the debounced watch loop

mod error;
mod history;
mod ledger;
mod mutation;
mod pipeline;
mod watcher;

pub use error::MutationError;
pub use history::{HistoryStats, OptimizationHistory};
pub use ledger::JobDb;
pub use mutation::{apply_block_condensation, apply_replacement, apply_with_writer, MutationOutcome};
pub use pipeline::{optimize_task, PipelineOutcome};
pub use watcher::{TaskEvent, Watcher, DEBOUNCE};
