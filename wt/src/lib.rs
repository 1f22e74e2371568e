//! WordTally - concurrent word frequency counter
//!
//! Reads standard input plus any number of named streams at once, splits each
//! into lower-cased alphabetic words, and folds them into one shared frequency
//! table. A reporter prints the sorted table on a fixed interval and once more
//! after every stream has ended.
//!
//! # Architecture
//!
//! ```text
//! stdin ──► reader ─┐
//! file  ──► reader ─┼─► FrequencyTable (one Mutex) ◄── reporter ──► stdout
//! pipe  ──► reader ─┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wordtally::{Coordinator, CoordinatorConfig};
//!
//! let coordinator = Coordinator::new(CoordinatorConfig::default())?;
//! let sources = coordinator.acquire(&paths)?;
//! let summary = coordinator.run(sources, std::io::stdout()).await?;
//! ```

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod reader;
pub mod report;
pub mod reporter;
pub mod source;
pub mod table;
pub mod tokenizer;

pub use coordinator::{Coordinator, CoordinatorConfig, CoordinatorError, Phase, RunSummary};
pub use reader::{ReaderStats, run_reader};
pub use report::{ReportError, render_report, write_report};
pub use reporter::{Reporter, ReporterExit};
pub use source::{Source, SourceError, acquire_sources};
pub use table::{FrequencyTable, Snapshot, TableError};
pub use tokenizer::{OverflowPolicy, Tokenizer, TokenizerOptions, Word, tokenize};
