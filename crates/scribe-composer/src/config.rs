//! Composer configuration.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SCRIBE_DATA_FILE` | `scribe-data.json` | JSON file holding notes and goal |
//! | `SCRIBE_EVENT_CAPACITY` | `256` | Composer event buffer per subscriber |

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use scribe_core::defaults::EVENT_BUS_CAPACITY;

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "scribe-data.json";

#[derive(Debug, Error)]
pub enum ComposerConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

fn parse_capacity(value: String) -> Result<usize, ComposerConfigError> {
    let parsed: Result<usize, _> = value.trim().parse();
    match parsed {
        Ok(capacity) => Ok(capacity),
        Err(_) => Err(ComposerConfigError::InvalidValue {
            name: "SCRIBE_EVENT_CAPACITY",
            value,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct ComposerConfig {
    pub data_file: PathBuf,
    pub event_capacity: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            event_capacity: EVENT_BUS_CAPACITY,
        }
    }
}

impl ComposerConfig {
    pub fn from_env() -> Result<Self, ComposerConfigError> {
        let mut config = Self::default();

        if let Ok(path) = env::var("SCRIBE_DATA_FILE") {
            if !path.trim().is_empty() {
                config.data_file = PathBuf::from(path);
            }
        }

        if let Ok(value) = env::var("SCRIBE_EVENT_CAPACITY") {
            config.event_capacity = parse_capacity(value)?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ComposerConfigError> {
        if self.event_capacity == 0 {
            return Err(ComposerConfigError::Validation(
                "event capacity must be greater than zero".to_string(),
            ));
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(ComposerConfigError::Validation(
                "data file path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
