use anyhow::Context;
use frugal_core::{analyze_task, OptimizationSettings, TriggerEngine};
use frugal_store::Paths;

pub fn run(task_id: Option<&str>) -> anyhow::Result<()> {
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

    let analysis = analyze_task(&task, &settings);
    // Read-only decision; suppression state is irrelevant for a one-shot view
    let decision = TriggerEngine::new().evaluate(&analysis, &settings);

    let cache_files: Vec<_> = analysis
        .cache
        .per_file_tokens
        .iter()
        .map(|(name, tokens)| serde_json::json!({"file": name, "tokens": tokens}))
        .collect();

    let output = serde_json::json!({
        "task_id": analysis.task_id,
        "conversation_tokens": analysis.conversation_tokens,
        "cache_tokens": analysis.cache.estimated_tokens,
        "total_tokens": analysis.total_tokens(),
        "file_block_count": analysis.file_block_count,
        "cache_files": cache_files,
        "would_trigger": decision.triggered,
        "reason": decision.reason.as_str(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
