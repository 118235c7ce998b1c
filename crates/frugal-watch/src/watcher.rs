//! Debounced watch loop
//!
//! Events arrive as JSON lines on a channel (fed from stdin by the CLI).
//! The external assistant writes the conversation in bursts, so each task's
//! optimization is deferred until its events settle for a debounce window.
//! Per-task runs are serialized by the loop itself; the trigger engine's
//! same-task suppression prevents immediate re-optimization loops caused by
//! our own rewrite.

use crate::history::OptimizationHistory;
use crate::ledger::JobDb;
use crate::pipeline::{optimize_task, PipelineOutcome};
use frugal_condense::CondenseEngine;
use frugal_core::{OptimizationSettings, TriggerEngine};
use frugal_store::Paths;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Quiet period after the last event before a task is optimized
pub const DEBOUNCE: Duration = Duration::from_secs(2);

/// One change notification for a task
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEvent {
    pub task_id: String,
}

pub struct Watcher {
    paths: Paths,
    engine: CondenseEngine,
    trigger: TriggerEngine,
    history: Arc<OptimizationHistory>,
    ledger: Option<JobDb>,
    debounce: Duration,
}

impl Watcher {
    pub fn new(paths: Paths, history: Arc<OptimizationHistory>, ledger: Option<JobDb>) -> Self {
        Self {
            paths,
            engine: CondenseEngine::new(),
            trigger: TriggerEngine::new(),
            history,
            ledger,
            debounce: DEBOUNCE,
        }
    }

    #[cfg(test)]
    fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Run until the event channel closes.
    ///
    /// A missing assistant storage directory is not fatal: events for
    /// unknown tasks are logged and skipped, so the watcher keeps running
    /// when the assistant has not produced any tasks yet.
    pub async fn run(mut self, mut events: mpsc::Receiver<TaskEvent>) {
        if self.paths.discover_tasks().is_empty() {
            tracing::warn!("no assistant tasks found yet, waiting for events");
        }

        let mut pending: HashMap<String, Instant> = HashMap::new();

        loop {
            let next_deadline = pending.values().min().copied();

            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(event) => {
                            pending.insert(event.task_id, Instant::now() + self.debounce);
                        }
                        None => break,
                    }
                }
                _ = tokio::time::sleep_until(next_deadline.unwrap_or_else(Instant::now)),
                    if next_deadline.is_some() =>
                {
                    let now = Instant::now();
                    let due: Vec<String> = pending
                        .iter()
                        .filter(|(_, deadline)| **deadline <= now)
                        .map(|(task_id, _)| task_id.clone())
                        .collect();
                    for task_id in due {
                        pending.remove(&task_id);
                        self.process(&task_id).await;
                    }
                }
            }
        }

        // Drain whatever was still pending when the channel closed
        let leftover: Vec<String> = pending.into_keys().collect();
        for task_id in leftover {
            self.process(&task_id).await;
        }
    }

    async fn process(&mut self, task_id: &str) {
        // Settings can change under us between cycles
        let settings = OptimizationSettings::load(&self.paths.settings_path());

        let Some(task) = self.paths.find_task(task_id) else {
            tracing::warn!(task_id, "event for unknown task, skipping");
            return;
        };

        match optimize_task(
            &task,
            &settings,
            &self.engine,
            &mut self.trigger,
            &self.history,
            self.ledger.as_ref(),
            false,
        )
        .await
        {
            Ok(PipelineOutcome::Applied { job, .. }) => {
                tracing::info!(
                    task_id,
                    tokens_saved = job.tokens_saved,
                    "watch cycle applied optimization"
                );
            }
            Ok(PipelineOutcome::Skipped(decision)) => {
                tracing::debug!(task_id, reason = decision.reason.as_str(), "watch cycle skipped");
            }
            Ok(PipelineOutcome::NothingToCondense(_)) => {
                tracing::debug!(task_id, "nothing worth condensing");
            }
            Err(e) => {
                tracing::warn!(task_id, error = %e, "watch cycle failed, conversation left intact");
            }
        }
    }
}
