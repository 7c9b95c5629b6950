//! Tracker configuration
//!
//! Callers pass [`IntentOptions`]; the tracker resolves them once into an
//! immutable [`IntentConfig`]. Overrides only take effect when truthy: a
//! timeout of `0` or a `debug` of `false` falls back to the default.

use crate::error::IntentResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default time before an armed tracker gives up, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Caller-supplied overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentOptions {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub debug: Option<bool>,
}

impl IntentOptions {
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn from_json_str(json: &str) -> IntentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file
    pub fn load(path: &Path) -> IntentResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Resolved, immutable tracker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentConfig {
    pub timeout_ms: u64,
    pub debug: bool,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            debug: false,
        }
    }
}

impl IntentConfig {
    /// Merge overrides onto the defaults, ignoring falsy values
    pub fn from_options(options: &IntentOptions) -> Self {
        let defaults = Self::default();
        Self {
            timeout_ms: options
                .timeout_ms
                .filter(|&ms| ms != 0)
                .unwrap_or(defaults.timeout_ms),
            debug: options.debug.filter(|&d| d).unwrap_or(defaults.debug),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl From<IntentOptions> for IntentConfig {
    fn from(options: IntentOptions) -> Self {
        Self::from_options(&options)
    }
}
