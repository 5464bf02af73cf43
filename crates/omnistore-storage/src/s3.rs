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
//! Amazon S3 adapter
//!
//! Objects are written with `PutObject` through the AWS SDK for Rust, which
//! also serves DigitalOcean Spaces through a custom endpoint (see
//! [`crate::spaces`]).
//!
//! # URL template
//!
//! ```text
//! https://{bucket}.s3.{region}.amazonaws.com/{key}
//! ```
//!
//! # Folders
//!
//! S3 has no directories. A folder is a zero-byte object whose key ends with
//! `/`, which is what the S3 console creates.
//!
//! # Credentials
//!
//! The static access key pair from the configuration is used as is; the
//! default AWS credential chain is not consulted.

use crate::allow_list::AllowList;
use crate::client::{ObjectClient, PutObject};
use crate::error::StorageResult;
use crate::files::FileSource;
use crate::keys;
use crate::target::ObjectTarget;
use crate::types::{BufferFileInfo, FileInfo, FileUploadOptions};
use crate::StorageProvider;
use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use omnistore_config::{ProviderKind, S3Config};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// [`ObjectClient`] over the AWS SDK S3 client
#[derive(Clone)]
pub struct S3ObjectClient {
    client: Client,
}

impl S3ObjectClient {
    /// Build a client from a static key pair
    ///
    /// `endpoint` overrides the AWS endpoint for S3-compatible services and
    /// must carry a scheme.
    pub async fn new(
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
        endpoint: Option<&str>,
    ) -> Self {
        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "omnistore",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .load()
            .await;

        // Override endpoint if provided (for S3-compatible services)
        let client = if let Some(endpoint) = endpoint {
            debug!("Using custom S3 endpoint: {}", endpoint);
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(s3_config)
        } else {
            Client::new(&sdk_config)
        };

        S3ObjectClient { client }
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: Client) -> Self {
        S3ObjectClient { client }
    }
}

#[async_trait]
impl ObjectClient for S3ObjectClient {
    async fn put_object(&self, bucket: &str, object: PutObject) -> anyhow::Result<Option<Value>> {
        let PutObject {
            key,
            body,
            content_type,
            metadata,
        } = object;

        self.client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .set_content_type(content_type)
            .set_metadata((!metadata.is_empty()).then_some(metadata))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to put object: {}", DisplayErrorContext(&e)))?;

        debug!("Successfully put object to S3: {}", key);
        Ok(None)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to delete object: {}", DisplayErrorContext(&e)))?;

        debug!("Successfully deleted object from S3: {}", key);
        Ok(())
    }
}

impl fmt::Debug for S3ObjectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3ObjectClient").finish_non_exhaustive()
    }
}

/// Amazon S3 storage adapter
#[derive(Debug, Clone)]
pub struct S3Provider {
    target: ObjectTarget,
    region: String,
}

impl S3Provider {
    /// Connect to the configured bucket
    ///
    /// No request is made; credentials are first exercised by the first
    /// upload or delete.
    pub async fn new(config: &S3Config, allowed: AllowList) -> Self {
        let client = S3ObjectClient::new(
            &config.region,
            &config.access_key_id,
            &config.secret_access_key,
            None,
        )
        .await;

        debug!(
            bucket = %config.bucket_name,
            region = %config.region,
            "Initialized S3 provider"
        );

        Self::with_client(config, Arc::new(client), allowed)
    }

    /// Use a prebuilt object client
    pub fn with_client(config: &S3Config, client: Arc<dyn ObjectClient>, allowed: AllowList) -> Self {
        S3Provider {
            target: ObjectTarget::new(ProviderKind::S3, &config.bucket_name, client, allowed),
            region: config.region.clone(),
        }
    }

    /// Replace the source used to read path uploads
    pub fn with_file_source(mut self, files: Arc<dyn FileSource>) -> Self {
        self.target = self.target.with_file_source(files);
        self
    }

    /// Region the bucket lives in
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Public URL of `key`
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.target.bucket(),
            self.region,
            key
        )
    }

    /// Key of the marker object for `folder`
    pub fn folder_marker_key(folder: &str) -> StorageResult<String> {
        Ok(format!("{}/", keys::normalize_folder(folder)?))
    }
}

#[async_trait]
impl StorageProvider for S3Provider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::S3
    }

    fn bucket(&self) -> &str {
        self.target.bucket()
    }

    async fn upload(&self, path: &Path, options: &FileUploadOptions) -> StorageResult<FileInfo> {
        let stored = self.target.upload_path(path, options).await?;
        Ok(FileInfo::new(&stored.key, self.public_url(&stored.key), ProviderKind::S3)
            .with_metadata(stored.metadata))
    }

    async fn upload_buffer(
        &self,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        let stored = self.target.upload_buffer(file, options).await?;
        Ok(FileInfo::new(&stored.key, self.public_url(&stored.key), ProviderKind::S3)
            .with_metadata(stored.metadata))
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.target.delete(id).await
    }

    async fn create_folder(&self, name: &str) -> StorageResult<()> {
        let key = Self::folder_marker_key(name)?;
        self.target.put_marker(&key).await
    }
}
