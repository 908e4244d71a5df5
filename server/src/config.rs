//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the durable ledger document (default: "data.json")
    pub ledger_path: PathBuf,

    /// Whether an unparseable ledger file is replaced with a fresh empty
    /// document instead of surfacing an error (default: true).
    ///
    /// This trades availability for a data-loss risk: the previous file
    /// content is discarded. Operators who prefer to fail loudly can set
    /// `LEDGER_RECOVER_ON_CORRUPT=false`.
    pub recover_on_corrupt: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            ledger_path: env::var("LEDGER_PATH")
                .map_or_else(|_| PathBuf::from("data.json"), PathBuf::from),
            recover_on_corrupt: env::var("LEDGER_RECOVER_ON_CORRUPT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            ledger_path: PathBuf::from("data.json"),
            recover_on_corrupt: true,
        }
    }
}
