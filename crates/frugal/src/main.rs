mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch => commands::watch::run(),
        Commands::Tasks => commands::tasks::run(),
        Commands::Analyze { task } => commands::analyze::run(task.as_deref()),
        Commands::Optimize { task, force } => commands::optimize::run(task.as_deref(), force),
        Commands::History { stats, limit } => commands::history::run(stats, limit),
        Commands::Status => commands::status::run(),
        Commands::Version => commands::version::run(),
    }
}
