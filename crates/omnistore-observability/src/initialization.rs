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
//! Logging initialization and setup.
//!
//! Installs a global `tracing` subscriber. Initialization can succeed only
//! once per process; later calls return [`LogError::AlreadyInitialized`].

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use std::io;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Initialize tracing with the specified format and optional filter.
///
/// # Example
///
/// ```ignore
/// use omnistore_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Compact, Some("debug")).unwrap();
/// tracing::info!("Application started");
/// ```
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(&config)
}

/// Initialize tracing with a detailed configuration.
///
/// # Example
///
/// ```ignore
/// use omnistore_observability::{init_tracing_with_config, LogConfig, LogFormat};
///
/// let config = LogConfig::new()
///     .with_format(LogFormat::Json)
///     .with_level("omnistore_storage=debug")
///     .with_timestamps(true);
///
/// init_tracing_with_config(&config).unwrap();
/// ```
pub fn init_tracing_with_config(config: &LogConfig) -> Result<(), LogError> {
    let filter = build_env_filter(config)?;

    tracing_subscriber::registry()
        .with(format_layer(config))
        .with(filter)
        .try_init()
        .map_err(|e| LogError::AlreadyInitialized(e.to_string()))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn format_layer(config: &LogConfig) -> BoxedLayer {
    let base = fmt::layer()
        .with_writer(writer_for(config.output))
        .with_target(config.include_targets);

    match config.format {
        LogFormat::Pretty => {
            let layer = base
                .with_ansi(config.use_color)
                .with_span_events(FmtSpan::CLOSE)
                .pretty();
            if config.use_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Compact => {
            let layer = base.with_ansi(config.use_color).compact();
            if config.use_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        // Machine-readable output never carries ANSI escapes
        LogFormat::Json => {
            let layer = base
                .with_ansi(false)
                .json()
                .with_current_span(true)
                .with_span_list(false);
            if config.use_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

fn writer_for(output: LogOutput) -> fn() -> Box<dyn io::Write + Send> {
    match output {
        LogOutput::Stderr => || Box::new(io::stderr()),
        LogOutput::Stdout => || Box::new(io::stdout()),
    }
}

/// Build an environment filter for the given configuration
pub(crate) fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let level = config.get_effective_level();
    let directives = config.filter_directives(&level);

    EnvFilter::try_new(&directives).map_err(|e| LogError::InvalidFilter {
        filter: level,
        reason: e.to_string(),
    })
}
