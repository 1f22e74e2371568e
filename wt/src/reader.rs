//! Reader task: drains one source into the frequency table

use tracing::{debug, info, warn};

use crate::source::Source;
use crate::table::{FrequencyTable, TableError};
use crate::tokenizer::{Tokenizer, TokenizerOptions};

/// What one reader task did with its source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Source name
    pub source: String,
    /// Words counted into the table
    pub words: u64,
    /// Words dropped because the table was full
    pub dropped: u64,
    /// Over-long runs rejected by the tokenizer
    pub rejected: u64,
    /// Whether the stream ended on a read error rather than a clean EOF
    pub read_failed: bool,
}

/// Tokenize `source` until end of stream, recording every word in `table`
///
/// A read error ends the stream for this source only. Capacity drops are
/// counted and logged. A poisoned table is the only error returned.
/// Blocking; run it on a dedicated thread.
pub fn run_reader(source: Source, table: &FrequencyTable, options: TokenizerOptions) -> Result<ReaderStats, TableError> {
    let (name, reader) = source.into_parts();
    debug!(source = %name, "Reader started");

    let mut stats = ReaderStats {
        source: name,
        ..Default::default()
    };
    let mut tokenizer = Tokenizer::with_options(reader, options);

    for word in tokenizer.by_ref() {
        match table.record_occurrence(word) {
            Ok(_) => stats.words += 1,
            Err(TableError::CapacityExceeded { capacity, word }) => {
                if stats.dropped == 0 {
                    warn!(source = %stats.source, capacity, %word, "Frequency table full, dropping new words");
                } else {
                    debug!(source = %stats.source, %word, "Dropped word, table full");
                }
                stats.dropped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    stats.rejected = tokenizer.rejected();
    if let Some(e) = tokenizer.take_error() {
        warn!(source = %stats.source, error = %e, "Read failed, treating as end of stream");
        stats.read_failed = true;
    }

    info!(
        source = %stats.source,
        words = stats.words,
        dropped = stats.dropped,
        rejected = stats.rejected,
        "Reader finished"
    );
    Ok(stats)
}
