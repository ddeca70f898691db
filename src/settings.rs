//! Run configuration.
//!
//! All knobs live in one immutable [`Settings`] value constructed at startup
//! and passed explicitly into the pool and runner; there is no process-wide
//! mutable state. The timeout knobs can additionally be loaded from a small
//! TOML file, with command-line flags taking precedence.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default per-read timeout in milliseconds.
const DEFAULT_READ_TIMEOUT_MS: u64 = 10;

/// Default cumulative per-response budget in milliseconds.
const DEFAULT_BUDGET_MS: u64 = 100;

/// Immutable configuration for one checker run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Server hostname or IP address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Number of trials to run.
    pub trials: u32,
    /// Requests sent (and responses read) per trial.
    pub slots: u32,
    /// Connections opened at startup and reused across trials.
    pub connections: u32,
    /// Timeout policy for response assembly.
    pub timeout: TimeoutPolicy,
}

impl Settings {
    /// Check the pool invariant and timeout sanity before any network
    /// activity happens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `connections < slots` or if either
    /// timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.connections < self.slots {
            return Err(Error::config(format!(
                "connections ({}) must be at least the number of requests per trial ({})",
                self.connections, self.slots
            )));
        }
        if self.timeout.per_read.is_zero() {
            return Err(Error::config("per-read timeout must be non-zero"));
        }
        if self.timeout.budget.is_zero() {
            return Err(Error::config("response budget must be non-zero"));
        }
        Ok(())
    }
}

/// Two-tier timeout policy for reading one response of known length.
///
/// `per_read` bounds each individual socket read for liveness; `budget`
/// bounds the total wall-clock time spent assembling one response. A
/// response still incomplete when the budget expires is reported as a
/// short read, which the runner's equality check turns into a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Timeout applied to each individual read call.
    pub per_read: Duration,
    /// Cumulative wall-clock budget for one full response.
    pub budget: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            per_read: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            budget: Duration::from_millis(DEFAULT_BUDGET_MS),
        }
    }
}

impl TimeoutPolicy {
    /// Resolve the effective policy from flags, an optional file overlay,
    /// and the built-in defaults, in that order of precedence.
    #[must_use]
    pub fn resolve(overlay: &TimeoutOverlay, read_ms: Option<u64>, budget_ms: Option<u64>) -> Self {
        Self {
            per_read: Duration::from_millis(
                read_ms.or(overlay.read_ms).unwrap_or(DEFAULT_READ_TIMEOUT_MS),
            ),
            budget: Duration::from_millis(
                budget_ms.or(overlay.budget_ms).unwrap_or(DEFAULT_BUDGET_MS),
            ),
        }
    }
}

/// Optional TOML settings file.
///
/// ```toml
/// [timeout]
/// read_ms = 25
/// budget_ms = 250
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Overlay {
    #[serde(default)]
    pub timeout: TimeoutOverlay,
}

/// Timeout keys of the settings file. Missing keys fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct TimeoutOverlay {
    pub read_ms: Option<u64>,
    pub budget_ms: Option<u64>,
}

impl Overlay {
    /// Load an overlay from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let overlay: Overlay = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(overlay)
    }
}
