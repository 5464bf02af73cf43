// Copyright (C) 2026  Omnistore Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Logging configuration types.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable consulted for the filter before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "OMNISTORE_LOG";

/// Targets held at `warn` unless the filter names them explicitly
pub const NOISY_TARGETS: &[&str] = &[
    "aws_config",
    "aws_smithy_runtime",
    "aws_sdk_s3",
    "google_cloud_auth",
    "google_cloud_storage",
    "hyper",
    "hyper_util",
    "reqwest",
    "rustls",
];

/// Errors raised while setting up logging
#[derive(Debug, Error)]
pub enum LogError {
    /// Unknown format name
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected filter
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Output format for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty-printed logs with colors and human-readable formatting
    #[default]
    Pretty,

    /// Compact single-line format
    Compact,

    /// JSON format for machine-readable logs
    Json,
}

impl LogFormat {
    /// Name accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LogError::InvalidFormat(format!(
                "Unknown format: {}. Expected one of: pretty, compact, json",
                s
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// Write to standard error
    #[default]
    Stderr,

    /// Write to standard output
    Stdout,
}

/// Configuration for logging
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format for logs
    pub format: LogFormat,

    /// Filter directive (e.g. "info", "omnistore_storage=debug")
    /// If None, taken from `OMNISTORE_LOG`, then `RUST_LOG`
    pub level: Option<String>,

    /// Whether to use colored output (ignored for JSON)
    pub use_color: bool,

    /// Whether to include timestamps in output
    pub use_timestamps: bool,

    /// Whether to include target module names
    pub include_targets: bool,

    /// Hold SDK and HTTP client targets at `warn`
    pub quiet_dependencies: bool,

    /// Output destination (stderr by default)
    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Pretty,
            level: None,
            use_color: true,
            use_timestamps: true,
            include_targets: true,
            quiet_dependencies: true,
            output: LogOutput::Stderr,
        }
    }
}

impl LogConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the filter directive
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Enable or disable color output
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Enable or disable timestamps
    pub fn with_timestamps(mut self, use_timestamps: bool) -> Self {
        self.use_timestamps = use_timestamps;
        self
    }

    /// Enable or disable target module names
    pub fn with_targets(mut self, include_targets: bool) -> Self {
        self.include_targets = include_targets;
        self
    }

    /// Enable or disable quieting of dependency targets
    pub fn with_quiet_dependencies(mut self, quiet: bool) -> Self {
        self.quiet_dependencies = quiet;
        self
    }

    /// Set the output destination
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Get the effective filter from config or environment
    pub fn get_effective_level(&self) -> String {
        self.effective_level_from(|name| std::env::var(name).ok())
    }

    /// Like [`get_effective_level`](Self::get_effective_level) with an
    /// injectable environment lookup
    pub fn effective_level_from<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        self.level
            .clone()
            .or_else(|| lookup(LOG_ENV_VAR))
            .or_else(|| lookup("RUST_LOG"))
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| "info".to_string())
    }

    /// Full filter string, with dependency targets appended when quieted
    pub fn filter_directives(&self, level: &str) -> String {
        let mut directives = level.to_string();
        if self.quiet_dependencies {
            for target in NOISY_TARGETS {
                if !level.contains(target) {
                    directives.push_str(&format!(",{}=warn", target));
                }
            }
        }
        directives
    }
}
