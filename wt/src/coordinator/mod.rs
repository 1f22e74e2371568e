//! Coordinator for the reader and reporter tasks
//!
//! The Coordinator moves through four phases:
//! - **Starting:** acquire every input source; any failure is fatal
//! - **Running:** one reader task per source plus the reporter, until all readers finish
//! - **Draining:** stop the reporter and wait for it to acknowledge
//! - **Finished:** write the final report

mod config;
mod core;
mod error;

pub use config::CoordinatorConfig;
pub use core::{Coordinator, Phase, RunSummary};
pub use error::CoordinatorError;
