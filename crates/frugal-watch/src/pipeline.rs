//! End-to-end optimization of one task
//!
//! One pass: analyze the task, evaluate triggers, optionally consult the
//! remote optimizer, otherwise condense file blocks locally, then record
//! the job in history and the ledger. Settings arrive by reference from a
//! fresh per-cycle load; nothing here caches them.

use crate::history::OptimizationHistory;
use crate::ledger::JobDb;
use crate::mutation::{self, MutationOutcome};
use frugal_condense::{optimize_remote, CondenseEngine};
use frugal_core::{
    CondenseMethod, OptimizationJob, OptimizationSettings, TriggerDecision, TriggerEngine,
};
use frugal_store::{estimate_tokens, TaskDir};
use std::collections::HashMap;

/// Outcome of one pipeline pass over a task
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Trigger conditions not met (and not forced)
    Skipped(TriggerDecision),
    /// Triggered, but no block shrank enough to be worth a rewrite
    NothingToCondense(TriggerDecision),
    /// Conversation rewritten and job recorded
    Applied {
        decision: TriggerDecision,
        job: OptimizationJob,
        backup_path: std::path::PathBuf,
    },
}

/// Analyze, decide, and optimize one task.
///
/// `force` bypasses the trigger decision but never the safety checks of the
/// mutation itself. Errors from the remote optimizer are logged and fall
/// back to local strategies; mutation errors propagate.
pub async fn optimize_task(
    task: &TaskDir,
    settings: &OptimizationSettings,
    engine: &CondenseEngine,
    trigger: &mut TriggerEngine,
    history: &OptimizationHistory,
    ledger: Option<&JobDb>,
    force: bool,
) -> anyhow::Result<PipelineOutcome> {
    let analysis = frugal_core::analyze_task(task, settings);
    let decision = trigger.evaluate(&analysis, settings);

    tracing::info!(
        task_id = %task.task_id,
        triggered = decision.triggered,
        reason = decision.reason.as_str(),
        total_tokens = decision.total_tokens,
        file_blocks = decision.file_block_count,
        "trigger evaluated"
    );

    if !decision.triggered && !force {
        return Ok(PipelineOutcome::Skipped(decision));
    }

    let Some(latest) = &analysis.latest_user else {
        return Ok(PipelineOutcome::NothingToCondense(decision));
    };
    let conversation_path = task.conversation_path();
    let message_tokens = estimate_tokens(&latest.text, settings.chars_per_token);

    // Remote first for large inputs, local strategies as the fallback
    if let Some(remote) = &settings.remote {
        if message_tokens >= remote.min_tokens {
            match optimize_remote(
                remote,
                settings.reduction_threshold,
                &task.task_id,
                &latest.text,
            )
            .await
            {
                Ok(Some(result)) => {
                    let outcome = mutation::apply_replacement(
                        &conversation_path,
                        &latest.key,
                        &result.optimized_content,
                    )?;
                    let finished = finish(task, settings, decision, outcome, history, ledger)?;
                    if matches!(finished, PipelineOutcome::Applied { .. }) {
                        trigger.mark_applied(&task.task_id);
                    }
                    return Ok(finished);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        task_id = %task.task_id,
                        error = %e,
                        "remote optimizer unavailable, using local strategies"
                    );
                }
            }
        }
    }

    let outcome =
        mutation::apply_block_condensation(&conversation_path, &latest.key, engine, settings)?;
    let finished = finish(task, settings, decision, outcome, history, ledger)?;
    if matches!(finished, PipelineOutcome::Applied { .. }) {
        trigger.mark_applied(&task.task_id);
    }
    Ok(finished)
}

/// Build the job record and persist it. A mutation that rewrote nothing
/// carries no backup and resolves to [`PipelineOutcome::NothingToCondense`].
fn finish(
    task: &TaskDir,
    settings: &OptimizationSettings,
    decision: TriggerDecision,
    outcome: MutationOutcome,
    history: &OptimizationHistory,
    ledger: Option<&JobDb>,
) -> anyhow::Result<PipelineOutcome> {
    let MutationOutcome {
        backup_path,
        condensed,
        original_chars,
        optimized_chars,
    } = outcome;
    let Some(backup_path) = backup_path else {
        return Ok(PipelineOutcome::NothingToCondense(decision));
    };

    let divisor = if settings.chars_per_token > 0.0 {
        settings.chars_per_token
    } else {
        frugal_store::DEFAULT_CHARS_PER_TOKEN
    };
    let original_tokens = (original_chars as f64 / divisor) as usize;
    let optimized_tokens = (optimized_chars as f64 / divisor) as usize;

    let mut method_counts: HashMap<String, usize> = HashMap::new();
    for file in &condensed {
        debug_assert_ne!(file.method, CondenseMethod::NoCompression);
        *method_counts
            .entry(file.method.as_str().to_string())
            .or_insert(0) += 1;
    }

    let job = OptimizationJob::new(&task.task_id, original_tokens, optimized_tokens, method_counts);
    tracing::info!(
        task_id = %task.task_id,
        tokens_saved = job.tokens_saved,
        reduction_pct = format!("{:.1}", job.reduction_pct),
        blocks = condensed.len(),
        "optimization applied"
    );

    history.record(job.clone());
    if let Some(db) = ledger {
        if let Err(e) = db.insert(&job) {
            tracing::warn!(error = %e, "failed to persist job to ledger");
        }
    }

    Ok(PipelineOutcome::Applied {
        decision,
        job,
        backup_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn make_task(dir: &Path, task_id: &str, message: &str) -> TaskDir {
        let task_dir = dir.join(task_id);
        fs::create_dir_all(&task_dir).unwrap();
        fs::write(
            task_dir.join(frugal_store::CONVERSATION_FILENAME),
            serde_json::to_vec_pretty(&json!([{"role": "user", "content": message}])).unwrap(),
        )
        .unwrap();
        TaskDir {
            task_id: task_id.to_string(),
            dir: task_dir,
        }
    }

    fn big_python_block() -> String {
        let mut src = String::new();
        for i in 0..500 {
            src.push_str(&format!(
                "def compute_{i}(a, b):\n    total = a + b * {i}\n    scaled = total * 2\n    emit(scaled)\n    record(total)\n    return total\n"
            ));
        }
        format!("<file_content path=\"calc.py\">\n{src}</file_content>")
    }

    #[tokio::test]
    async fn test_skipped_when_under_thresholds() {
        let temp = tempfile::TempDir::new().unwrap();
        let task = make_task(temp.path(), "small-task", "just a short question");
        let settings = OptimizationSettings::new();
        let engine = CondenseEngine::new();
        let mut trigger = TriggerEngine::new();
        let history = OptimizationHistory::new();

        let outcome = optimize_task(
            &task, &settings, &engine, &mut trigger, &history, None, false,
        )
        .await
        .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Skipped(_)));
        assert_eq!(history.stats().job_count, 0);
    }

    #[tokio::test]
    async fn test_forced_run_applies_and_records() {
        let temp = tempfile::TempDir::new().unwrap();
        let task = make_task(temp.path(), "forced-task", &big_python_block());
        let settings = OptimizationSettings::new();
        let engine = CondenseEngine::new();
        let mut trigger = TriggerEngine::new();
        let history = OptimizationHistory::new();
        let ledger = JobDb::new(&temp.path().join("jobs.db")).unwrap();

        let outcome = optimize_task(
            &task,
            &settings,
            &engine,
            &mut trigger,
            &history,
            Some(&ledger),
            true,
        )
        .await
        .unwrap();

        let PipelineOutcome::Applied { job, backup_path, .. } = outcome else {
            panic!("expected applied outcome");
        };
        assert!(job.tokens_saved > 0);
        assert_eq!(
            job.method_counts.get("python_structure_extraction"),
            Some(&1)
        );
        assert!(backup_path.exists());

        assert_eq!(history.stats().job_count, 1);
        assert_eq!(ledger.recent(10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_incompressible_task_leaves_no_backups_behind() {
        let temp = tempfile::TempDir::new().unwrap();
        // Clears the token threshold, but the block has too few lines for
        // any strategy to shrink it
        let line = "x".repeat(2_000);
        let mut blob = String::new();
        for _ in 0..60 {
            blob.push_str(&line);
            blob.push('\n');
        }
        let message = format!("<file_content path=\"dump.weird\">\n{blob}</file_content>");
        let task = make_task(temp.path(), "stubborn-task", &message);
        let settings = OptimizationSettings::new();
        let engine = CondenseEngine::new();
        let mut trigger = TriggerEngine::new();
        let history = OptimizationHistory::new();

        for _ in 0..3 {
            let outcome = optimize_task(
                &task, &settings, &engine, &mut trigger, &history, None, false,
            )
            .await
            .unwrap();
            assert!(matches!(outcome, PipelineOutcome::NothingToCondense(_)));
        }

        // Only the conversation file remains after repeated triggered runs
        assert_eq!(fs::read_dir(&task.dir).unwrap().count(), 1);
        assert_eq!(history.stats().job_count, 0);
    }

    #[tokio::test]
    async fn test_triggered_run_suppressed_on_second_pass() {
        let temp = tempfile::TempDir::new().unwrap();
        // Large enough to clear the 50k token threshold on its own
        let mut message = String::new();
        for _ in 0..30 {
            message.push_str(&big_python_block());
            message.push('\n');
        }
        let task = make_task(temp.path(), "big-task", &message);
        let settings = OptimizationSettings::new();
        let engine = CondenseEngine::new();
        let mut trigger = TriggerEngine::new();
        let history = OptimizationHistory::new();

        let first = optimize_task(
            &task, &settings, &engine, &mut trigger, &history, None, false,
        )
        .await
        .unwrap();
        assert!(matches!(first, PipelineOutcome::Applied { .. }));

        // Same task immediately after: suppressed even if still large
        let second = optimize_task(
            &task, &settings, &engine, &mut trigger, &history, None, false,
        )
        .await
        .unwrap();
        let PipelineOutcome::Skipped(decision) = second else {
            panic!("expected skip on re-run");
        };
        assert_eq!(
            decision.reason,
            frugal_core::TriggerReason::RecentlyOptimized
        );
    }
}
