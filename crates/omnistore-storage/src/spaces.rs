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
//! DigitalOcean Spaces adapter
//!
//! Spaces speaks the S3 API, so writes go through [`S3ObjectClient`] pointed
//! at the configured endpoint.
//!
//! # Endpoint
//!
//! The endpoint may be given with or without a scheme
//! (`nyc3.digitaloceanspaces.com` or `https://nyc3.digitaloceanspaces.com`).
//! The SDK receives it with `https://` added when missing; public URLs use
//! the bare host:
//!
//! ```text
//! https://{bucket}.{endpoint host}/{key}
//! ```

use crate::allow_list::AllowList;
use crate::client::ObjectClient;
use crate::error::StorageResult;
use crate::files::FileSource;
use crate::keys;
use crate::s3::S3ObjectClient;
use crate::target::ObjectTarget;
use crate::types::{BufferFileInfo, FileInfo, FileUploadOptions};
use crate::StorageProvider;
use async_trait::async_trait;
use omnistore_config::{DoSpacesConfig, ProviderKind};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// DigitalOcean Spaces storage adapter
#[derive(Debug, Clone)]
pub struct DoSpacesProvider {
    target: ObjectTarget,
    endpoint_host: String,
}

impl DoSpacesProvider {
    /// Connect to the configured Space
    pub async fn new(config: &DoSpacesConfig, allowed: AllowList) -> Self {
        let endpoint = endpoint_url(&config.endpoint);
        let client = S3ObjectClient::new(
            &config.region,
            &config.access_key_id,
            &config.secret_access_key,
            Some(&endpoint),
        )
        .await;

        debug!(
            bucket = %config.bucket_name,
            endpoint = %endpoint,
            "Initialized DigitalOcean Spaces provider"
        );

        Self::with_client(config, Arc::new(client), allowed)
    }

    /// Use a prebuilt object client
    pub fn with_client(
        config: &DoSpacesConfig,
        client: Arc<dyn ObjectClient>,
        allowed: AllowList,
    ) -> Self {
        DoSpacesProvider {
            target: ObjectTarget::new(ProviderKind::DoSpaces, &config.bucket_name, client, allowed),
            endpoint_host: endpoint_host(&config.endpoint).to_string(),
        }
    }

    /// Replace the source used to read path uploads
    pub fn with_file_source(mut self, files: Arc<dyn FileSource>) -> Self {
        self.target = self.target.with_file_source(files);
        self
    }

    /// Endpoint host without scheme
    pub fn endpoint_host(&self) -> &str {
        &self.endpoint_host
    }

    /// Public URL of `key`
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.{}/{}",
            self.target.bucket(),
            self.endpoint_host,
            key
        )
    }

    /// Key of the marker object for `folder`
    pub fn folder_marker_key(folder: &str) -> StorageResult<String> {
        Ok(format!("{}/", keys::normalize_folder(folder)?))
    }
}

/// Endpoint as handed to the SDK
pub fn endpoint_url(endpoint: &str) -> String {
    if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    }
}

/// Endpoint with any scheme and trailing slash removed
pub fn endpoint_host(endpoint: &str) -> &str {
    endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint)
        .trim_end_matches('/')
}

#[async_trait]
impl StorageProvider for DoSpacesProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DoSpaces
    }

    fn bucket(&self) -> &str {
        self.target.bucket()
    }

    async fn upload(&self, path: &Path, options: &FileUploadOptions) -> StorageResult<FileInfo> {
        let stored = self.target.upload_path(path, options).await?;
        Ok(
            FileInfo::new(&stored.key, self.public_url(&stored.key), ProviderKind::DoSpaces)
                .with_metadata(stored.metadata),
        )
    }

    async fn upload_buffer(
        &self,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        let stored = self.target.upload_buffer(file, options).await?;
        Ok(
            FileInfo::new(&stored.key, self.public_url(&stored.key), ProviderKind::DoSpaces)
                .with_metadata(stored.metadata),
        )
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.target.delete(id).await
    }

    async fn create_folder(&self, name: &str) -> StorageResult<()> {
        let key = Self::folder_marker_key(name)?;
        self.target.put_marker(&key).await
    }
}
