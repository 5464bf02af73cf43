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
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating storage configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading a configuration file failed
    #[error("cannot read storage configuration: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or shape error
    #[error("invalid TOML storage configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML syntax or shape error
    #[error("invalid YAML storage configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or shape error
    #[error("invalid JSON storage configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// File extension is not one of toml, yaml, yml, json
    #[error("unsupported configuration format '{0}' (expected toml, yaml or json)")]
    UnsupportedFormat(String),

    /// Configuration file does not exist
    #[error("storage configuration not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Path has no usable extension
    #[error("cannot infer configuration format from path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// An `OMNISTORE_*` variable is set but unusable
    #[error("invalid environment variable {name}={value}: {reason}")]
    InvalidEnvVar {
        /// Variable name
        name: String,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A field holds a value outside its schema
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// A required field is absent or empty
    #[error("missing required field '{0}'")]
    MissingRequired(String),

    /// Provider tag has no backend
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::ValidationError`]
    pub fn validation_error(message: impl Into<String>) -> Self {
        ConfigError::ValidationError(message.into())
    }

    /// Shorthand for [`ConfigError::InvalidEnvVar`]
    pub fn invalid_env_var(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidEnvVar {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ConfigError::InvalidValue`]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ConfigError::UnsupportedProvider`]
    pub fn unsupported_provider(tag: impl Into<String>) -> Self {
        ConfigError::UnsupportedProvider(tag.into())
    }

    /// Whether the provider tag was the problem
    pub fn is_unsupported_provider(&self) -> bool {
        matches!(self, ConfigError::UnsupportedProvider(_))
    }
}

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
