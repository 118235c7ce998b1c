use anyhow::Context;
use frugal_condense::CondenseEngine;
use frugal_core::{OptimizationSettings, TriggerEngine};
use frugal_store::Paths;
use frugal_watch::{optimize_task, JobDb, OptimizationHistory, PipelineOutcome};

pub fn run(task_id: Option<&str>, force: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let settings = OptimizationSettings::load(&paths.settings_path());

    let task = match task_id {
        Some(id) => paths
            .find_task(id)
            .with_context(|| format!("task {id} not found"))?,
        None => paths
            .discover_tasks()
            .into_iter()
            .next()
            .context("no assistant tasks found")?,
    };

    std::fs::create_dir_all(paths.frugal_dir())?;
    let ledger = JobDb::new(&paths.jobs_db_path())?;
    let engine = CondenseEngine::new();
    let mut trigger = TriggerEngine::new();
    let history = OptimizationHistory::new();

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(optimize_task(
        &task,
        &settings,
        &engine,
        &mut trigger,
        &history,
        Some(&ledger),
        force,
    ))?;

    match outcome {
        PipelineOutcome::Applied { job, backup_path, .. } => {
            println!(
                "Optimized {}: saved {} tokens ({:.1}% reduction)",
                job.task_id, job.tokens_saved, job.reduction_pct
            );
            println!("Backup: {}", backup_path.display());
        }
        PipelineOutcome::Skipped(decision) => {
            println!(
                "Not triggered: {} ({} tokens, {} file blocks)",
                decision.reason.as_str(),
                decision.total_tokens,
                decision.file_block_count
            );
        }
        PipelineOutcome::NothingToCondense(_) => {
            println!("Nothing worth condensing in the latest user message.");
        }
    }
    Ok(())
}
