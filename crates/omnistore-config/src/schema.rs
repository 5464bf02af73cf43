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
use crate::validation::Validator;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Storage provider tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProviderKind {
    /// Google Cloud Storage
    Gcs,
    /// Amazon S3
    S3,
    /// DigitalOcean Spaces
    DoSpaces,
    /// Reserved; no backend exists for it
    Cloudinary,
}

impl ProviderKind {
    /// Wire tag, as accepted in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gcs => "gcs",
            ProviderKind::S3 => "s3",
            ProviderKind::DoSpaces => "do-spaces",
            ProviderKind::Cloudinary => "cloudinary",
        }
    }

    /// Human readable name for logs and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gcs => "GCS",
            ProviderKind::S3 => "S3",
            ProviderKind::DoSpaces => "DO Spaces",
            ProviderKind::Cloudinary => "Cloudinary",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "gcs" => Ok(ProviderKind::Gcs),
            "s3" => Ok(ProviderKind::S3),
            "do-spaces" => Ok(ProviderKind::DoSpaces),
            "cloudinary" => Ok(ProviderKind::Cloudinary),
            other => Err(ConfigError::unsupported_provider(other)),
        }
    }
}

impl TryFrom<String> for ProviderKind {
    type Error = ConfigError;

    fn try_from(value: String) -> ConfigResult<Self> {
        value.parse()
    }
}

impl From<ProviderKind> for String {
    fn from(kind: ProviderKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Top-level storage configuration
///
/// `config` is the provider-specific blob; its shape depends on `provider`
/// and is checked by [`CloudStorageConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CloudStorageConfig {
    /// Which backend to talk to
    pub provider: ProviderKind,

    /// Provider-specific credentials and bucket settings
    pub config: Value,

    /// Optional MIME allow-list; absent means no restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_file_types: Option<Vec<String>>,
}

impl CloudStorageConfig {
    /// Create a configuration without an allow-list
    pub fn new(provider: ProviderKind, config: Value) -> Self {
        CloudStorageConfig {
            provider,
            config,
            allowed_file_types: None,
        }
    }

    /// Set the MIME allow-list
    pub fn with_allowed_file_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_file_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Decode and validate the provider blob into its typed form
    ///
    /// Fails with [`ConfigError::UnsupportedProvider`] for tags that have no
    /// backend.
    pub fn resolve(&self) -> ConfigResult<ProviderConfig> {
        let resolved = match self.provider {
            ProviderKind::Gcs => ProviderConfig::Gcs(decode_blob(self.provider, &self.config)?),
            ProviderKind::S3 => ProviderConfig::S3(decode_blob(self.provider, &self.config)?),
            ProviderKind::DoSpaces => {
                ProviderConfig::DoSpaces(decode_blob(self.provider, &self.config)?)
            }
            ProviderKind::Cloudinary => {
                return Err(ConfigError::unsupported_provider(self.provider.as_str()))
            }
        };
        resolved.validate()?;
        Ok(resolved)
    }

    /// Get a string field from the provider blob, if present
    pub fn blob_str(&self, field: &str) -> Option<&str> {
        self.config.get(field).and_then(Value::as_str)
    }

    /// Set a string field in the provider blob
    ///
    /// A non-object blob is replaced by an object holding only this field.
    pub fn set_blob_str(&mut self, field: &str, value: impl Into<String>) {
        if !self.config.is_object() {
            self.config = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.config {
            map.insert(field.to_string(), Value::String(value.into()));
        }
    }
}

fn decode_blob<T: DeserializeOwned>(provider: ProviderKind, blob: &Value) -> ConfigResult<T> {
    serde_json::from_value(blob.clone()).map_err(|e| {
        ConfigError::validation_error(format!("invalid {} config: {}", provider, e))
    })
}

/// Google Cloud Storage settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GcsConfig {
    /// Bucket name
    pub bucket_name: String,
    /// Service account key, as the JSON object Google issues
    pub credentials: Map<String, Value>,
}

impl fmt::Debug for GcsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsConfig")
            .field("bucket_name", &self.bucket_name)
            .field("credentials", &"***")
            .finish()
    }
}

/// Amazon S3 settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct S3Config {
    /// AWS region, e.g. `us-east-1`
    pub region: String,
    /// Bucket name
    pub bucket_name: String,
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("access_key_id", &"***")
            .field("secret_access_key", &"***")
            .finish()
    }
}

/// DigitalOcean Spaces settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DoSpacesConfig {
    /// Spaces region, e.g. `nyc3`
    pub region: String,
    /// Spaces endpoint host, e.g. `nyc3.digitaloceanspaces.com`
    pub endpoint: String,
    /// Space name
    pub bucket_name: String,
    /// Spaces access key
    pub access_key_id: String,
    /// Spaces secret key
    pub secret_access_key: String,
}

impl fmt::Debug for DoSpacesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoSpacesConfig")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("bucket_name", &self.bucket_name)
            .field("access_key_id", &"***")
            .field("secret_access_key", &"***")
            .finish()
    }
}

/// Provider blob decoded into its typed form
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// Google Cloud Storage
    Gcs(GcsConfig),
    /// Amazon S3
    S3(S3Config),
    /// DigitalOcean Spaces
    DoSpaces(DoSpacesConfig),
}

impl ProviderConfig {
    /// Provider tag of this configuration
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::Gcs(_) => ProviderKind::Gcs,
            ProviderConfig::S3(_) => ProviderKind::S3,
            ProviderConfig::DoSpaces(_) => ProviderKind::DoSpaces,
        }
    }

    /// Bucket the provider targets
    pub fn bucket_name(&self) -> &str {
        match self {
            ProviderConfig::Gcs(c) => &c.bucket_name,
            ProviderConfig::S3(c) => &c.bucket_name,
            ProviderConfig::DoSpaces(c) => &c.bucket_name,
        }
    }
}

/// Per-call upload options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileUploadOptions {
    /// Object key to write; defaults depend on the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Custom metadata attached to the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl FileUploadOptions {
    /// Options with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the destination key
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}
