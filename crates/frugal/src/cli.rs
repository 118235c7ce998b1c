use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "frugal")]
#[command(version)]
#[command(about = "Context optimization for AI coding assistants")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch for task changes and optimize automatically
    Watch,

    /// List discovered assistant tasks
    Tasks,

    /// Analyze a task's context footprint without modifying it
    Analyze {
        /// Task id (most recent task if omitted)
        #[arg(short, long)]
        task: Option<String>,
    },

    /// Optimize one task now
    Optimize {
        /// Task id (most recent task if omitted)
        #[arg(short, long)]
        task: Option<String>,

        /// Run even when trigger conditions are not met
        #[arg(long)]
        force: bool,
    },

    /// View recorded optimization jobs
    History {
        /// Show statistics summary
        #[arg(long)]
        stats: bool,

        /// Maximum number of jobs to list
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show configuration and storage status
    Status,

    /// Print version information
    Version,
}
