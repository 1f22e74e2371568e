//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::CoordinatorError;
use crate::tokenizer::{DEFAULT_MAX_WORD_LEN, OverflowPolicy, TokenizerOptions};

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Time between periodic reports in milliseconds
    #[serde(rename = "report-interval-ms", default = "default_report_interval_ms")]
    pub report_interval_ms: u64,

    /// Max named sources besides stdin (None = no bound)
    #[serde(rename = "max-sources", default = "default_max_sources")]
    pub max_sources: Option<usize>,

    /// Max word length in characters
    #[serde(rename = "max-word-len", default = "default_max_word_len")]
    pub max_word_len: usize,

    /// Handling of runs longer than max_word_len
    #[serde(rename = "word-overflow", default)]
    pub word_overflow: OverflowPolicy,

    /// Max distinct words (None = unbounded)
    #[serde(rename = "table-capacity", default)]
    pub table_capacity: Option<usize>,

    /// Whether standard input is one of the sources
    #[serde(rename = "read-stdin", default = "default_read_stdin")]
    pub read_stdin: bool,
}

fn default_report_interval_ms() -> u64 {
    debug!("default_report_interval_ms: called");
    10_000
}

fn default_max_sources() -> Option<usize> {
    debug!("default_max_sources: called");
    Some(9)
}

fn default_max_word_len() -> usize {
    debug!("default_max_word_len: called");
    DEFAULT_MAX_WORD_LEN
}

fn default_read_stdin() -> bool {
    true
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            report_interval_ms: 10_000,
            max_sources: Some(9),
            max_word_len: DEFAULT_MAX_WORD_LEN,
            word_overflow: OverflowPolicy::Truncate,
            table_capacity: None,
            read_stdin: true,
        }
    }
}

impl CoordinatorConfig {
    /// Get the report interval as a Duration
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            max_word_len: self.max_word_len,
            overflow: self.word_overflow,
        }
    }

    /// Reject settings no run can work with
    pub fn validate(&self) -> Result<(), CoordinatorError> {
        if self.report_interval_ms == 0 {
            return Err(CoordinatorError::Config("report-interval-ms must be greater than 0".to_string()));
        }
        if self.max_word_len == 0 {
            return Err(CoordinatorError::Config("max-word-len must be greater than 0".to_string()));
        }
        if self.table_capacity == Some(0) {
            return Err(CoordinatorError::Config("table-capacity must be greater than 0".to_string()));
        }
        Ok(())
    }
}
