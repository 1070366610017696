use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "squigrank")]
#[command(about = "Watches FR measurement catalogs and ranks devices against preference targets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check all configured sources for newly published measurements
    Sync,
    /// Fetch measurements, score them, and export per-category ranking CSVs
    Rank,
    /// Print the most recent new-measurement finds
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Print configuration values
    PrintConfig,
    /// Delete the persisted catalog and history
    ResetStore,
}
