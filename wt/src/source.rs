//! Input source acquisition
//!
//! Sources are opened before any task is spawned, so a bad path or too many
//! paths aborts the run with nothing left to unwind.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Name given to standard input
pub const STDIN_NAME: &str = "<stdin>";

/// Errors acquiring input sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Too many sources: {given} given, at most {max} allowed besides stdin")]
    TooManySources { given: usize, max: usize },

    #[error("Failed to open source {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A named byte stream owned by exactly one reader task
pub struct Source {
    name: String,
    reader: Box<dyn Read + Send>,
}

impl Source {
    pub fn new(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// Standard input
    pub fn stdin() -> Self {
        Self::new(STDIN_NAME, io::stdin())
    }

    /// Open a file or named pipe for reading
    ///
    /// Opening a FIFO blocks until a writer connects.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        debug!(path = %path.display(), "Source::open: called");
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), file))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_parts(self) -> (String, Box<dyn Read + Send>) {
        (self.name, self.reader)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Check the named-source count against the configured bound
pub fn check_source_count(given: usize, max: Option<usize>) -> Result<(), SourceError> {
    match max {
        Some(max) if given > max => Err(SourceError::TooManySources { given, max }),
        _ => Ok(()),
    }
}

/// Acquire stdin (optionally) plus every path, in order
///
/// The count bound is checked before anything is opened. The first failure
/// closes whatever was already opened and is returned.
pub fn acquire_sources(paths: &[PathBuf], read_stdin: bool, max: Option<usize>) -> Result<Vec<Source>, SourceError> {
    check_source_count(paths.len(), max)?;

    let mut sources = Vec::with_capacity(paths.len() + usize::from(read_stdin));
    if read_stdin {
        sources.push(Source::stdin());
    }
    for path in paths {
        sources.push(Source::open(path)?);
    }

    info!(count = sources.len(), "Input sources acquired");
    Ok(sources)
}
