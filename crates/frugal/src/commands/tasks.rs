use frugal_store::Paths;

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let tasks = paths.discover_tasks();

    if tasks.is_empty() {
        println!("No assistant tasks found.");
        return Ok(());
    }

    for task in tasks {
        let size = std::fs::metadata(task.conversation_path())
            .map(|m| m.len())
            .unwrap_or(0);
        println!("{}  {:>10} bytes  {}", task.task_id, size, task.dir.display());
    }
    Ok(())
}
