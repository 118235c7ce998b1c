use frugal_core::OptimizationSettings;
use frugal_store::Paths;
use frugal_watch::JobDb;

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let settings = OptimizationSettings::load(&paths.settings_path());
    let roots = paths.storage_roots();
    let tasks = paths.discover_tasks();

    let total_saved = JobDb::new(&paths.jobs_db_path())
        .and_then(|db| db.total_tokens_saved())
        .unwrap_or(0);

    let output = serde_json::json!({
        "enabled": settings.enabled,
        "token_threshold": settings.token_threshold,
        "file_count_threshold": settings.file_count_threshold,
        "aggressive_mode": settings.aggressive_mode,
        "remote_configured": settings.remote.is_some(),
        "storage_roots": roots.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "task_count": tasks.len(),
        "total_tokens_saved": total_saved,
        "settings_path": paths.settings_path().display().to_string(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
