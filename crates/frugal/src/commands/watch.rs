//! Watch command: stdin JSON lines feed the debounced optimizer loop.
//!
//! Each line is either a JSON object with a `task_id` field or a bare task
//! id. The editor-side extension pipes change notifications here; closing
//! stdin shuts the loop down cleanly.

use frugal_store::Paths;
use frugal_watch::{JobDb, OptimizationHistory, TaskEvent, Watcher};
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    std::fs::create_dir_all(paths.frugal_dir())?;

    let ledger = match JobDb::new(&paths.jobs_db_path()) {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!(error = %e, "job ledger unavailable, continuing without persistence");
            None
        }
    };

    let history = Arc::new(OptimizationHistory::new());
    let watcher = Watcher::new(paths, Arc::clone(&history), ledger);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let (tx, rx) = mpsc::channel::<TaskEvent>(64);

        // Blocking stdin reader; the channel closing ends the loop
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let event = match serde_json::from_str::<TaskEvent>(line) {
                    Ok(event) => event,
                    Err(_) => TaskEvent {
                        task_id: line.to_string(),
                    },
                };
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        tracing::info!("watching for task events on stdin");
        watcher.run(rx).await;
    });

    let stats = history.stats();
    if stats.job_count > 0 {
        println!(
            "Session: {} optimizations, {} tokens saved",
            stats.job_count, stats.total_tokens_saved
        );
    }
    Ok(())
}
