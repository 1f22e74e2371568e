//! Configuration for wordtally

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::coordinator::CoordinatorConfig;

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Task and table settings
    pub coordinator: CoordinatorConfig,
}

impl Config {
    /// Pre-read just the log level, before logging is set up
    ///
    /// Follows the same lookup as `load` but never fails; an unreadable file
    /// yields None and is reported by `load` once logging is running.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        #[derive(Deserialize)]
        struct LogLevelOnly {
            #[serde(rename = "log-level")]
            log_level: Option<String>,
        }

        let path = match config_path {
            Some(path) => path.clone(),
            None => candidate_paths().into_iter().find(|p| p.exists())?,
        };
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str::<LogLevelOnly>(&content).ok()?.log_level
    }

    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise `./.wordtally.yml`, then
    /// `<config_dir>/wordtally/wordtally.yml`, then defaults. A fallback
    /// file that fails to load is warned about and skipped.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in candidate_paths().iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {:#}", candidate.display(), e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Fallback config locations, in lookup order
fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(".wordtally.yml")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("wordtally").join("wordtally.yml"));
    }
    candidates
}
