//! Configuration with environment variable support.
//!
//! The verification timeout is a fixed policy and deliberately has no knob;
//! the poll interval beneath it is only a tuning detail and can be overridden.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SHEET_PILOT_POLL_MS` | Verification poll interval (ms) | `250` |
//! | `SHEET_PILOT_PAGE_FIXTURE` | Page fixture for offline runs | `./page.json` |

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

/// Default verification poll interval (milliseconds)
pub const DEFAULT_POLL_MS: u64 = 250;

/// Default page fixture path for offline CLI runs
pub const DEFAULT_PAGE_FIXTURE: &str = "./page.json";

/// Environment variable for the poll interval
pub const ENV_POLL_MS: &str = "SHEET_PILOT_POLL_MS";

/// Environment variable for the page fixture path
pub const ENV_PAGE_FIXTURE: &str = "SHEET_PILOT_PAGE_FIXTURE";

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for Sheet Pilot
#[derive(Debug, Clone)]
pub struct Config {
    /// Verification poll interval (milliseconds)
    pub poll_ms: u64,
    /// Page fixture path for offline runs
    pub page_fixture: String,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            poll_ms: env::var(ENV_POLL_MS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_MS),
            page_fixture: env::var(ENV_PAGE_FIXTURE)
                .unwrap_or_else(|_| DEFAULT_PAGE_FIXTURE.to_string()),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            poll_ms: DEFAULT_POLL_MS,
            page_fixture: DEFAULT_PAGE_FIXTURE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Get the configured poll interval (convenience function)
pub fn poll_interval() -> Duration {
    Duration::from_millis(get().poll_ms)
}
