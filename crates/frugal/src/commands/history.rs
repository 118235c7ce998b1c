use frugal_store::Paths;
use frugal_watch::JobDb;

pub fn run(stats: bool, limit: usize) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let db_path = paths.jobs_db_path();
    if !db_path.exists() {
        println!("No optimization jobs recorded yet.");
        return Ok(());
    }

    let db = JobDb::new(&db_path)?;
    let jobs = db.recent(limit.max(1))?;

    if jobs.is_empty() {
        println!("No optimization jobs recorded yet.");
        return Ok(());
    }

    if stats {
        let count = jobs.len();
        let avg_reduction = jobs.iter().map(|j| j.reduction_pct).sum::<f64>() / count as f64;
        println!("Jobs shown:        {}", count);
        println!("Tokens saved:      {}", db.total_tokens_saved()?);
        println!("Avg reduction:     {:.1}%", avg_reduction);
        if let Some(last) = jobs.iter().map(|j| j.timestamp).max() {
            println!("Last optimization: {}", last.to_rfc3339());
        }
        return Ok(());
    }

    for job in jobs {
        let methods: Vec<String> = job
            .method_counts
            .iter()
            .map(|(method, count)| format!("{method}x{count}"))
            .collect();
        println!(
            "{}  {}  -{} tokens ({:.1}%)  [{}]",
            job.timestamp.format("%Y-%m-%d %H:%M:%S"),
            job.task_id,
            job.tokens_saved,
            job.reduction_pct,
            methods.join(", ")
        );
    }
    Ok(())
}
