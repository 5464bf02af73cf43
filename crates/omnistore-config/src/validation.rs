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
//! Validation gate for storage configuration and per-call options.
//!
//! Every check here is pure: nothing touches the network or the filesystem.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::*;
use regex_lite::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Validator for configuration settings
pub trait Validator {
    /// Check the value against its schema
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for CloudStorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.provider {
            // Reserved tag: no schema to check; the factory rejects it.
            ProviderKind::Cloudinary => self.validate_envelope(),
            _ => self.validated_provider_config().map(|_| ()),
        }
    }
}

impl CloudStorageConfig {
    /// Run every check and return the typed provider configuration
    ///
    /// The provider blob is decoded once. Fails with
    /// [`ConfigError::UnsupportedProvider`] for tags that have no backend.
    pub fn validated_provider_config(&self) -> ConfigResult<ProviderConfig> {
        self.validate_envelope()?;
        self.resolve()
    }

    fn validate_envelope(&self) -> ConfigResult<()> {
        if !self.config.is_object() {
            return Err(ConfigError::invalid_value("config", "must be an object"));
        }

        if let Some(types) = &self.allowed_file_types {
            if let Some(mime) = types.iter().find(|mime| !is_valid_mime_type(mime)) {
                return Err(ConfigError::invalid_value(
                    "allowedFileTypes",
                    format!("'{}' does not match the type/subtype pattern", mime),
                ));
            }
        }

        Ok(())
    }
}

impl Validator for ProviderConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self {
            ProviderConfig::Gcs(gcs) => gcs.validate(),
            ProviderConfig::S3(s3) => s3.validate(),
            ProviderConfig::DoSpaces(spaces) => spaces.validate(),
        }
    }
}

impl Validator for GcsConfig {
    fn validate(&self) -> ConfigResult<()> {
        require("config.bucketName", &self.bucket_name)?;

        if self.credentials.is_empty() {
            return Err(ConfigError::MissingRequired(
                "config.credentials".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validator for S3Config {
    fn validate(&self) -> ConfigResult<()> {
        require("config.region", &self.region)?;
        require("config.bucketName", &self.bucket_name)?;
        require("config.accessKeyId", &self.access_key_id)?;
        require("config.secretAccessKey", &self.secret_access_key)?;
        Ok(())
    }
}

impl Validator for DoSpacesConfig {
    fn validate(&self) -> ConfigResult<()> {
        require("config.region", &self.region)?;
        require("config.endpoint", &self.endpoint)?;
        require("config.bucketName", &self.bucket_name)?;
        require("config.accessKeyId", &self.access_key_id)?;
        require("config.secretAccessKey", &self.secret_access_key)?;
        Ok(())
    }
}

impl Validator for FileUploadOptions {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(destination) = &self.destination {
            if destination.is_empty() {
                return Err(ConfigError::invalid_value(
                    "destination",
                    "must not be empty",
                ));
            }
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::MissingRequired(field.to_string()));
    }
    Ok(())
}

/// `type/subtype` tokens of word characters, dots and dashes
static MIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\w.]+/[-\w.]+$").expect("MIME pattern compiles"));

/// Check a MIME type against `^[-\w.]+/[-\w.]+$`
pub fn is_valid_mime_type(value: &str) -> bool {
    MIME_PATTERN.is_match(value)
}

/// Validate an untyped configuration value
///
/// A `null` input is treated as an empty object. Unknown provider tags fail
/// with [`ConfigError::UnsupportedProvider`]; every other schema violation is
/// a validation error.
pub fn parse_cloud_storage_config(input: Value) -> ConfigResult<CloudStorageConfig> {
    let input = if input.is_null() {
        Value::Object(Default::default())
    } else {
        input
    };

    match input.get("provider") {
        Some(Value::String(tag)) => {
            tag.parse::<ProviderKind>()?;
        }
        Some(_) => {
            return Err(ConfigError::invalid_value("provider", "must be a string"));
        }
        None => return Err(ConfigError::MissingRequired("provider".to_string())),
    }

    let config: CloudStorageConfig = serde_json::from_value(input)
        .map_err(|e| ConfigError::validation_error(format!("Invalid storage config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Validate untyped per-call upload options
///
/// `None` and `null` both mean "no options".
pub fn parse_file_upload_options(input: Option<Value>) -> ConfigResult<FileUploadOptions> {
    let options = match input {
        None | Some(Value::Null) => FileUploadOptions::default(),
        Some(value) => serde_json::from_value(value).map_err(|e| {
            ConfigError::validation_error(format!("Invalid file upload options: {}", e))
        })?,
    };
    options.validate()?;
    Ok(options)
}
