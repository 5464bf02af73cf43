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
//! Bucket-bound write path shared by the provider adapters
//!
//! [`ObjectTarget`] holds what every adapter needs for one bucket: the vendor
//! client, the local file source and the allow-list. It derives keys, checks
//! file types and wraps failures with the adapter's provider and operation.
//! The adapters add their URL template and folder convention on top.

use crate::allow_list::AllowList;
use crate::client::{ObjectClient, PutObject};
use crate::error::{Operation, StorageError, StorageResult};
use crate::files::{FileSource, FsFileSource};
use crate::keys;
use crate::types::{BufferFileInfo, FileUploadOptions};
use omnistore_config::{ProviderKind, Validator};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// An object written by [`ObjectTarget`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Final object key
    pub key: String,
    /// Vendor metadata reported by the client
    pub metadata: Option<Value>,
}

/// Vendor client bound to one bucket
#[derive(Clone)]
pub struct ObjectTarget {
    provider: ProviderKind,
    bucket: String,
    client: Arc<dyn ObjectClient>,
    files: Arc<dyn FileSource>,
    allowed: AllowList,
}

impl ObjectTarget {
    /// Bind `client` to `bucket`, reading path uploads from the filesystem
    pub fn new(
        provider: ProviderKind,
        bucket: impl Into<String>,
        client: Arc<dyn ObjectClient>,
        allowed: AllowList,
    ) -> Self {
        ObjectTarget {
            provider,
            bucket: bucket.into(),
            client,
            files: Arc::new(FsFileSource),
            allowed,
        }
    }

    /// Replace the source used to read path uploads
    pub fn with_file_source(mut self, files: Arc<dyn FileSource>) -> Self {
        self.files = files;
        self
    }

    /// Provider this target reports failures as
    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Bucket every write goes to
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Configured allow-list
    pub fn allowed(&self) -> &AllowList {
        &self.allowed
    }

    /// Upload a local file
    ///
    /// The key is `options.destination` or the file's base name.
    pub async fn upload_path(
        &self,
        path: &Path,
        options: &FileUploadOptions,
    ) -> StorageResult<StoredObject> {
        options.validate()?;
        let content_type = self.allowed.check_path(path)?;
        let key = match &options.destination {
            Some(destination) => destination.clone(),
            None => keys::base_name(path)?,
        };

        let body = self
            .files
            .read(path)
            .await
            .map_err(|e| self.failure(Operation::Upload, e))?;

        debug!(
            provider = %self.provider,
            bucket = %self.bucket,
            key = %key,
            size = body.len(),
            "Uploading file"
        );

        let object = PutObject::new(key, body)
            .with_content_type(content_type)
            .with_metadata(options.metadata.as_ref());
        self.put(Operation::Upload, object).await
    }

    /// Upload an in-memory buffer
    ///
    /// The key is `options.destination` or a random name keeping the original
    /// extension.
    pub async fn upload_buffer(
        &self,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<StoredObject> {
        options.validate()?;
        self.allowed.check_declared(&file.mime_type)?;
        let key = options
            .destination
            .clone()
            .unwrap_or_else(|| keys::random_object_name(&file.original_name));

        debug!(
            provider = %self.provider,
            bucket = %self.bucket,
            key = %key,
            size = file.len(),
            "Uploading buffer"
        );

        let object = PutObject::new(key, file.buffer.clone())
            .with_content_type(Some(file.mime_type.clone()))
            .with_metadata(options.metadata.as_ref());
        self.put(Operation::UploadBuffer, object).await
    }

    /// Remove one object
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        keys::validate_key(key)?;
        debug!(provider = %self.provider, bucket = %self.bucket, key = %key, "Deleting object");

        self.client
            .delete_object(&self.bucket, key)
            .await
            .map_err(|e| self.failure(Operation::Delete, e))
    }

    /// Write an empty folder marker object
    pub async fn put_marker(&self, key: &str) -> StorageResult<()> {
        debug!(provider = %self.provider, bucket = %self.bucket, key = %key, "Writing folder marker");
        self.put(Operation::CreateFolder, PutObject::new(key, bytes::Bytes::new()))
            .await
            .map(|_| ())
    }

    async fn put(&self, operation: Operation, object: PutObject) -> StorageResult<StoredObject> {
        let key = object.key.clone();
        let metadata = self
            .client
            .put_object(&self.bucket, object)
            .await
            .map_err(|e| self.failure(operation, e))?;

        debug!(provider = %self.provider, key = %key, "Stored object");
        Ok(StoredObject { key, metadata })
    }

    fn failure<E>(&self, operation: Operation, err: E) -> StorageError
    where
        E: Into<anyhow::Error>,
    {
        StorageError::provider(self.provider, operation, err)
    }
}

impl fmt::Debug for ObjectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTarget")
            .field("provider", &self.provider)
            .field("bucket", &self.bucket)
            .field("allowed", &self.allowed)
            .finish()
    }
}
