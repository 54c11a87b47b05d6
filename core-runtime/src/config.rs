//! # Core Configuration Module
//!
//! Provides configuration management for the library lending core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `LibraryConfig` holding the database location, connection pool limits,
//! the injected clock and the logging setup. `build()` validates eagerly so a
//! misconfigured host fails at startup instead of on the first issue.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::LibraryConfig;
//!
//! let config = LibraryConfig::builder()
//!     .database_path("/tmp/library.db")
//!     .max_connections(2)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.max_connections, 2);
//! ```
//!
//! ## Environment
//!
//! [`LibraryConfigBuilder::from_env`] seeds a builder from `LIBRARY_DB_PATH`
//! and `LIBRARY_LOG_LEVEL`; explicit setter calls afterwards take precedence.

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use bridge_traits::time::{Clock, LogLevel, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming the SQLite database file
pub const ENV_DATABASE_PATH: &str = "LIBRARY_DB_PATH";

/// Environment variable holding the minimum log level
pub const ENV_LOG_LEVEL: &str = "LIBRARY_LOG_LEVEL";

/// Database file used when none is configured
pub const DEFAULT_DATABASE_PATH: &str = "library.db";

/// Placeholder shown in loan history for loans that are still out
pub const DEFAULT_NOT_RETURNED_LABEL: &str = "--- Not Returned ---";

/// Core configuration for the library lending core.
///
/// Use [`LibraryConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct LibraryConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// Maximum time to wait for a pooled connection
    pub acquire_timeout: Duration,

    /// History placeholder for loans without a return date
    pub not_returned_label: String,

    /// Source of "today" for issue and return dates
    pub clock: Arc<dyn Clock>,

    /// Logging setup applied by the bootstrapper
    pub logging: LoggingConfig,
}

impl std::fmt::Debug for LibraryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryConfig")
            .field("database_path", &self.database_path)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("not_returned_label", &self.not_returned_label)
            .field("clock", &"Clock { ... }")
            .field("logging", &self.logging)
            .finish()
    }
}

impl LibraryConfig {
    /// Creates a new builder for constructing a `LibraryConfig`.
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - At least one connection is allowed
    /// - The not-returned label is not blank
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        if self.max_connections == 0 {
            return Err(Error::Config(
                "Connection pool must allow at least one connection".to_string(),
            ));
        }

        if self.acquire_timeout.is_zero() {
            return Err(Error::Config(
                "Acquire timeout must be greater than zero".to_string(),
            ));
        }

        if self.not_returned_label.trim().is_empty() {
            return Err(Error::Config(
                "Not-returned label cannot be blank".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`LibraryConfig`] instances.
#[derive(Default)]
pub struct LibraryConfigBuilder {
    database_path: Option<PathBuf>,
    max_connections: Option<u32>,
    acquire_timeout: Option<Duration>,
    not_returned_label: Option<String>,
    clock: Option<Arc<dyn Clock>>,
    logging: Option<LoggingConfig>,
    log_level: Option<LogLevel>,
}

impl LibraryConfigBuilder {
    /// Seeds a builder from the process environment.
    ///
    /// Unset variables are ignored. An unparseable `LIBRARY_LOG_LEVEL` is an
    /// error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::default();

        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|p| !p.trim().is_empty()) {
            builder.database_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            let level = level.parse::<LogLevel>().map_err(|e| {
                Error::Config(format!("{} is invalid: {}", ENV_LOG_LEVEL, e))
            })?;
            builder.log_level = Some(level);
        }

        Ok(builder)
    }

    /// Sets the database path.
    ///
    /// Default: `library.db` in the working directory
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the maximum number of pooled connections.
    ///
    /// Default: 5
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Sets how long to wait for a pooled connection.
    ///
    /// Default: 30 seconds
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Sets the history placeholder for loans that are still out.
    pub fn not_returned_label(mut self, label: impl Into<String>) -> Self {
        self.not_returned_label = Some(label.into());
        self
    }

    /// Injects the clock used to date issues and returns.
    ///
    /// Default: [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the logging configuration.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Overrides only the minimum log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Builds the final `LibraryConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if any value fails [`LibraryConfig::validate`].
    pub fn build(self) -> Result<LibraryConfig> {
        let mut logging = self.logging.unwrap_or_default();
        if let Some(level) = self.log_level {
            logging = logging.with_level(level);
        }

        let config = LibraryConfig {
            database_path: self
                .database_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            max_connections: self.max_connections.unwrap_or(5),
            acquire_timeout: self.acquire_timeout.unwrap_or(Duration::from_secs(30)),
            not_returned_label: self
                .not_returned_label
                .unwrap_or_else(|| DEFAULT_NOT_RETURNED_LABEL.to_string()),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            logging,
        };

        config.validate()?;

        Ok(config)
    }
}
