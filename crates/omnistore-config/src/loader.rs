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
use crate::error::{ConfigError, ConfigResult};
use crate::schema::{CloudStorageConfig, ProviderKind};
use crate::validation::{is_valid_mime_type, parse_cloud_storage_config, Validator};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Environment variable naming the provider tag
pub const ENV_PROVIDER: &str = "OMNISTORE_PROVIDER";
/// Environment variable naming the bucket
pub const ENV_BUCKET: &str = "OMNISTORE_BUCKET";
/// Environment variable naming the region
pub const ENV_REGION: &str = "OMNISTORE_REGION";
/// Environment variable naming the S3-compatible endpoint
pub const ENV_ENDPOINT: &str = "OMNISTORE_ENDPOINT";
/// Environment variable holding the access key id
pub const ENV_ACCESS_KEY_ID: &str = "OMNISTORE_ACCESS_KEY_ID";
/// Environment variable holding the secret access key
pub const ENV_SECRET_ACCESS_KEY: &str = "OMNISTORE_SECRET_ACCESS_KEY";
/// Environment variable holding a comma separated MIME allow-list
pub const ENV_ALLOWED_FILE_TYPES: &str = "OMNISTORE_ALLOWED_FILE_TYPES";
/// Environment variable naming a GCS service account JSON file
pub const ENV_GCS_CREDENTIALS: &str = "OMNISTORE_GCS_CREDENTIALS";

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML
    Toml,
    /// YAML
    Yaml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::InvalidPath(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Loads a [`CloudStorageConfig`] from files and the environment
pub struct ConfigLoader {
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<CloudStorageConfig> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).await?;
        let format = ConfigFormat::from_path(path)?;

        info!(
            "Loaded {} configuration file: {}",
            format.name(),
            path.display()
        );

        self.load_from_string(&content, format)
    }

    /// Load configuration from a string
    pub fn load_from_string(
        &self,
        content: &str,
        format: ConfigFormat,
    ) -> ConfigResult<CloudStorageConfig> {
        // Parse to a neutral tree first so unknown provider tags surface as
        // UnsupportedProvider instead of a format-specific parse error
        let value: Value = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };

        let config = if self.validate {
            let config = parse_cloud_storage_config(value)?;
            info!("Configuration validated successfully");
            config
        } else {
            serde_json::from_value(value)?
        };

        debug!(provider = %config.provider, "Configuration loaded from {}", format.name());
        Ok(config)
    }

    /// Load configuration from a file, then apply environment overrides
    pub async fn load_with_overrides<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> ConfigResult<CloudStorageConfig> {
        let mut config = self.load_file(path).await?;
        self.apply_env_overrides(&mut config)?;
        if self.validate {
            config.validate()?;
        }
        Ok(config)
    }

    /// Apply `OMNISTORE_*` environment variable overrides
    pub fn apply_env_overrides(&self, config: &mut CloudStorageConfig) -> ConfigResult<()> {
        self.apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup` instead of the process environment
    pub fn apply_overrides_from<F>(&self, config: &mut CloudStorageConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PROVIDER) {
            config.provider = value.parse()?;
        }

        for (variable, field) in [
            (ENV_BUCKET, "bucketName"),
            (ENV_REGION, "region"),
            (ENV_ENDPOINT, "endpoint"),
            (ENV_ACCESS_KEY_ID, "accessKeyId"),
            (ENV_SECRET_ACCESS_KEY, "secretAccessKey"),
        ] {
            if let Some(value) = lookup(variable) {
                config.set_blob_str(field, value);
            }
        }

        if let Some(value) = lookup(ENV_ALLOWED_FILE_TYPES) {
            let types = parse_list(&value);
            if let Some(bad) = types.iter().find(|t| !is_valid_mime_type(t)) {
                return Err(ConfigError::invalid_env_var(
                    ENV_ALLOWED_FILE_TYPES,
                    &value,
                    format!("'{}' is not a MIME type", bad),
                ));
            }
            config.allowed_file_types = Some(types);
        }

        Ok(())
    }

    /// Build a configuration from environment variables alone
    pub async fn from_env(&self) -> ConfigResult<CloudStorageConfig> {
        self.from_lookup(|name| std::env::var(name).ok()).await
    }

    /// Build a configuration from variables read through `lookup`
    pub async fn from_lookup<F>(&self, lookup: F) -> ConfigResult<CloudStorageConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tag = lookup(ENV_PROVIDER)
            .ok_or_else(|| ConfigError::MissingRequired(ENV_PROVIDER.to_string()))?;
        let provider: ProviderKind = tag.parse()?;

        let mut blob = Map::new();
        if provider == ProviderKind::Gcs {
            let path = lookup(ENV_GCS_CREDENTIALS)
                .ok_or_else(|| ConfigError::MissingRequired(ENV_GCS_CREDENTIALS.to_string()))?;
            let raw = fs::read_to_string(&path).await?;
            let credentials: Value = serde_json::from_str(&raw)?;
            blob.insert("credentials".to_string(), credentials);
        }

        let mut config = CloudStorageConfig::new(provider, Value::Object(blob));
        self.apply_overrides_from(&mut config, lookup)?;

        if self.validate {
            config.validate()?;
        }

        debug!(provider = %config.provider, "Configuration built from environment");
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
