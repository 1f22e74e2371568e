//! CLI argument parsing for wordtally

use clap::Parser;
use std::path::PathBuf;

use crate::coordinator::CoordinatorConfig;

#[derive(Parser, Debug)]
#[command(name = "wordtally")]
#[command(
    author,
    version,
    about = "Count words from stdin and named streams concurrently",
    long_about = None,
    after_help = "Reports go to stdout; logs go to stderr."
)]
pub struct Cli {
    /// Files or named pipes to read in addition to stdin
    pub sources: Vec<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Milliseconds between periodic reports
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Do not read standard input
    #[arg(long)]
    pub no_stdin: bool,

    /// Limit the table to this many distinct words
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Max named sources besides stdin
    #[arg(long)]
    pub max_sources: Option<usize>,
}

impl Cli {
    /// Apply command-line overrides on top of file configuration
    pub fn apply_overrides(&self, mut config: CoordinatorConfig) -> CoordinatorConfig {
        if let Some(interval_ms) = self.interval_ms {
            config.report_interval_ms = interval_ms;
        }
        if self.no_stdin {
            config.read_stdin = false;
        }
        if let Some(capacity) = self.capacity {
            config.table_capacity = Some(capacity);
        }
        if let Some(max_sources) = self.max_sources {
            config.max_sources = Some(max_sources);
        }
        config
    }
}
