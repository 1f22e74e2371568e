//! Reporter task: periodically prints a sorted snapshot of the table

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::report::{ReportError, write_report};
use crate::table::FrequencyTable;

/// Returned when the reporter stops; hands the sink back to the caller
#[derive(Debug)]
pub struct ReporterExit<W> {
    pub sink: W,
    /// Periodic reports written
    pub reports: u64,
}

/// Sleeps for `interval`, then writes a report, until told to stop
pub struct Reporter<W> {
    table: Arc<FrequencyTable>,
    sink: W,
    interval: Duration,
    reports: u64,
}

impl<W: Write + Send + 'static> Reporter<W> {
    pub fn new(table: Arc<FrequencyTable>, sink: W, interval: Duration) -> Self {
        debug!(?interval, "Reporter::new: called");
        Self {
            table,
            sink,
            interval,
            reports: 0,
        }
    }

    /// Run until `stop_rx` yields or its sender is dropped
    ///
    /// The stop signal is only observed between reports, so a report block
    /// is never cut short. A stop arriving mid-sleep ends the sleep at once.
    pub async fn run(mut self, mut stop_rx: mpsc::Receiver<()>) -> Result<ReporterExit<W>, ReportError> {
        info!(interval = ?self.interval, "Reporter started");

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.recv() => {
                    debug!("Reporter stop requested");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {
                    let entries = write_report_blocking(&mut self.sink, &self.table)?;
                    self.reports += 1;
                    debug!(report = self.reports, entries, "Periodic report written");
                }
            }
        }

        info!(reports = self.reports, "Reporter stopped");
        Ok(ReporterExit {
            sink: self.sink,
            reports: self.reports,
        })
    }
}

/// Write a report from async code without parking a runtime worker
///
/// On a multi-thread runtime the sink I/O runs under `block_in_place`, so a
/// stalled sink holds only this task's thread. Elsewhere it writes inline.
pub(crate) fn write_report_blocking<W: Write>(sink: &mut W, table: &FrequencyTable) -> Result<usize, ReportError> {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(|| write_report(sink, table)),
        _ => write_report(sink, table),
    }
}
