//! Main Coordinator implementation

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::config::CoordinatorConfig;
use super::error::CoordinatorError;
use crate::reader::{ReaderStats, run_reader};
use crate::reporter::{Reporter, ReporterExit, write_report_blocking};
use crate::source::{Source, acquire_sources};
use crate::table::{FrequencyTable, TableError};

/// Coordinator lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Running,
    Draining,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Starting => "starting",
            Phase::Running => "running",
            Phase::Draining => "draining",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-source reader results, in source order
    pub readers: Vec<ReaderStats>,
    /// Distinct words in the final report
    pub distinct_words: usize,
    /// Sum of counts in the final report
    pub total_occurrences: u64,
    /// Periodic reports written before the final one
    pub periodic_reports: u64,
}

/// Owns the frequency table and supervises every task that touches it
pub struct Coordinator {
    config: CoordinatorConfig,
    table: Arc<FrequencyTable>,
    phase: Phase,
}

impl Coordinator {
    /// Create a Coordinator with a fresh table
    pub fn new(config: CoordinatorConfig) -> Result<Self, CoordinatorError> {
        config.validate()?;

        let table = match config.table_capacity {
            Some(capacity) => FrequencyTable::with_capacity_limit(capacity),
            None => FrequencyTable::new(),
        };

        Ok(Self {
            config,
            table: Arc::new(table),
            phase: Phase::Starting,
        })
    }

    /// Shared handle to the table
    pub fn table(&self) -> Arc<FrequencyTable> {
        Arc::clone(&self.table)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = %self.phase, to = %phase, "Coordinator phase change");
        self.phase = phase;
    }

    /// Open stdin (if configured) and every path
    ///
    /// Nothing has been spawned yet, so an error here leaves no task behind.
    pub fn acquire(&self, paths: &[PathBuf]) -> Result<Vec<Source>, CoordinatorError> {
        debug!(paths = paths.len(), "Coordinator::acquire: called");
        Ok(acquire_sources(paths, self.config.read_stdin, self.config.max_sources)?)
    }

    /// Run readers and the reporter to completion, then write the final report
    ///
    /// Returns only after every reader has finished and the reporter has been
    /// stopped and joined. The final report reflects every recorded word.
    pub async fn run<W>(mut self, sources: Vec<Source>, sink: W) -> Result<RunSummary, CoordinatorError>
    where
        W: Write + Send + 'static,
    {
        self.enter(Phase::Running);

        let (stop_tx, stop_rx) = mpsc::channel::<()>(1);
        let reporter = Reporter::new(self.table(), sink, self.config.report_interval());
        let reporter_handle = tokio::spawn(reporter.run(stop_rx));

        let readers = self.spawn_readers(sources);
        info!(readers = readers.len(), "Reader tasks spawned");

        let (stats, reader_failure) = join_readers(readers).await;

        self.enter(Phase::Draining);
        // The reporter may already be gone after a write error; its join reports that
        let _ = stop_tx.send(()).await;
        drop(stop_tx);

        let reporter_result = reporter_handle.await;
        if let Some(err) = reader_failure {
            return Err(err);
        }
        let ReporterExit { mut sink, reports } = match reporter_result {
            Ok(result) => result?,
            Err(e) => {
                error!(error = %e, "Reporter task failed");
                return Err(CoordinatorError::TaskFailed {
                    task: "reporter".to_string(),
                    reason: e.to_string(),
                });
            }
        };

        self.enter(Phase::Finished);
        let distinct_words = write_report_blocking(&mut sink, &self.table)?;
        let total_occurrences = self.table.total()?;

        let summary = RunSummary {
            readers: stats,
            distinct_words,
            total_occurrences,
            periodic_reports: reports,
        };
        info!(
            sources = summary.readers.len(),
            distinct_words = summary.distinct_words,
            total = summary.total_occurrences,
            periodic_reports = summary.periodic_reports,
            "Run complete"
        );
        Ok(summary)
    }

    fn spawn_readers(&self, sources: Vec<Source>) -> Vec<(String, JoinHandle<Result<ReaderStats, TableError>>)> {
        let options = self.config.tokenizer_options();
        sources
            .into_iter()
            .map(|source| {
                let name = source.name().to_string();
                let table = self.table();
                debug!(source = %name, "Spawning reader task");
                let handle = tokio::task::spawn_blocking(move || run_reader(source, &table, options));
                (name, handle)
            })
            .collect()
    }
}

/// Wait for every reader, in any completion order
///
/// All handles are awaited even after a failure so no reader outlives the run.
/// The first failure is returned alongside the stats of the readers that succeeded.
async fn join_readers(
    readers: Vec<(String, JoinHandle<Result<ReaderStats, TableError>>)>,
) -> (Vec<ReaderStats>, Option<CoordinatorError>) {
    let mut stats = Vec::with_capacity(readers.len());
    let mut failure = None;

    for (name, handle) in readers {
        match handle.await {
            Ok(Ok(reader_stats)) => stats.push(reader_stats),
            Ok(Err(e)) => {
                error!(source = %name, error = %e, "Reader hit an unrecoverable table error");
                failure.get_or_insert(CoordinatorError::Table(e));
            }
            Err(e) => {
                error!(source = %name, error = %e, "Reader task failed");
                failure.get_or_insert(CoordinatorError::TaskFailed {
                    task: format!("reader {name}"),
                    reason: e.to_string(),
                });
            }
        }
    }

    (stats, failure)
}
