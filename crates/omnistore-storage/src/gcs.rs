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
//! Google Cloud Storage adapter
//!
//! Authenticates with a service-account credentials object taken inline from
//! the configuration (no key file on disk) and uploads with a multipart
//! request so content type and user metadata land on the object in one call.
//!
//! # URL template
//!
//! ```text
//! https://storage.googleapis.com/{bucket}/{key}
//! ```
//!
//! # Folders
//!
//! A folder is materialized as an empty `{folder}/.placeholder` object.
//!
//! # Metadata
//!
//! The object resource returned by the upload is passed back verbatim in
//! [`FileInfo::metadata`].

use crate::allow_list::AllowList;
use crate::client::ObjectClient;
use crate::error::StorageResult;
use crate::files::FileSource;
use crate::keys;
use crate::target::ObjectTarget;
use crate::types::{BufferFileInfo, FileInfo, FileUploadOptions};
use crate::StorageProvider;
use async_trait::async_trait;
use omnistore_config::ProviderKind;
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "gcs")]
pub use self::client::GcsObjectClient;

/// Name of the marker object written inside a folder
pub const FOLDER_PLACEHOLDER: &str = ".placeholder";

/// Google Cloud Storage adapter
#[derive(Debug, Clone)]
pub struct GcsProvider {
    target: ObjectTarget,
}

impl GcsProvider {
    /// Authenticate with the configured credentials and bind to the bucket
    #[cfg(feature = "gcs")]
    pub async fn new(config: &omnistore_config::GcsConfig, allowed: AllowList) -> StorageResult<Self> {
        let client = GcsObjectClient::from_credentials(&config.credentials)
            .await
            .map_err(|e| {
                omnistore_config::ConfigError::validation_error(format!(
                    "Invalid GCS credentials: {:#}",
                    e
                ))
            })?;

        tracing::debug!(bucket = %config.bucket_name, "Initialized GCS provider");

        Ok(Self::with_client(&config.bucket_name, Arc::new(client), allowed))
    }

    /// Use a prebuilt object client
    pub fn with_client(
        bucket: impl Into<String>,
        client: Arc<dyn ObjectClient>,
        allowed: AllowList,
    ) -> Self {
        GcsProvider {
            target: ObjectTarget::new(ProviderKind::Gcs, bucket, client, allowed),
        }
    }

    /// Replace the source used to read path uploads
    pub fn with_file_source(mut self, files: Arc<dyn FileSource>) -> Self {
        self.target = self.target.with_file_source(files);
        self
    }

    /// Public URL of `key`
    pub fn public_url(&self, key: &str) -> String {
        format!("https://storage.googleapis.com/{}/{}", self.target.bucket(), key)
    }

    /// Key of the marker object for `folder`
    pub fn folder_marker_key(folder: &str) -> StorageResult<String> {
        keys::folder_object_key(folder, FOLDER_PLACEHOLDER)
    }

    fn file_info(&self, stored: crate::target::StoredObject) -> FileInfo {
        FileInfo::new(&stored.key, self.public_url(&stored.key), ProviderKind::Gcs)
            .with_metadata(stored.metadata)
    }
}

#[async_trait]
impl StorageProvider for GcsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gcs
    }

    fn bucket(&self) -> &str {
        self.target.bucket()
    }

    async fn upload(&self, path: &Path, options: &FileUploadOptions) -> StorageResult<FileInfo> {
        let stored = self.target.upload_path(path, options).await?;
        Ok(self.file_info(stored))
    }

    async fn upload_buffer(
        &self,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        let stored = self.target.upload_buffer(file, options).await?;
        Ok(self.file_info(stored))
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.target.delete(id).await
    }

    async fn create_folder(&self, name: &str) -> StorageResult<()> {
        let key = Self::folder_marker_key(name)?;
        self.target.put_marker(&key).await
    }
}

#[cfg(feature = "gcs")]
mod client {
    use crate::client::{ObjectClient, PutObject};
    use anyhow::{anyhow, Context};
    use async_trait::async_trait;
    use google_cloud_auth::credentials::CredentialsFile;
    use google_cloud_storage::client::{Client as GcsClient, ClientConfig};
    use google_cloud_storage::http::objects::delete::DeleteObjectRequest;
    use google_cloud_storage::http::objects::upload::{UploadObjectRequest, UploadType};
    use google_cloud_storage::http::objects::Object;
    use serde_json::{Map, Value};
    use std::fmt;
    use std::sync::Arc;
    use tracing::{debug, warn};

    /// [`ObjectClient`] over the `google-cloud-storage` client
    #[derive(Clone)]
    pub struct GcsObjectClient {
        client: Arc<GcsClient>,
    }

    impl GcsObjectClient {
        /// Authenticate with an inline service-account credentials object
        pub async fn from_credentials(credentials: &Map<String, Value>) -> anyhow::Result<Self> {
            let cred: CredentialsFile =
                serde_json::from_value(Value::Object(credentials.clone()))
                    .context("failed to parse service account credentials")?;

            let config = ClientConfig::default()
                .with_credentials(cred)
                .await
                .map_err(|e| anyhow!("failed to create client config: {}", e))?;

            Ok(GcsObjectClient {
                client: Arc::new(GcsClient::new(config)),
            })
        }
    }

    #[async_trait]
    impl ObjectClient for GcsObjectClient {
        async fn put_object(
            &self,
            bucket: &str,
            object: PutObject,
        ) -> anyhow::Result<Option<Value>> {
            let PutObject {
                key,
                body,
                content_type,
                metadata,
            } = object;

            let resource = Object {
                name: key.clone(),
                content_type,
                metadata: (!metadata.is_empty()).then_some(metadata),
                ..Default::default()
            };
            let req = UploadObjectRequest {
                bucket: bucket.to_string(),
                ..Default::default()
            };

            let uploaded = self
                .client
                .upload_object(&req, body, &UploadType::Multipart(Box::new(resource)))
                .await
                .map_err(|e| anyhow!("GCS upload error: {}", e))?;

            debug!(key = %key, "Successfully uploaded object to GCS");

            match serde_json::to_value(&uploaded) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Could not encode GCS object metadata");
                    Ok(None)
                }
            }
        }

        async fn delete_object(&self, bucket: &str, key: &str) -> anyhow::Result<()> {
            let req = DeleteObjectRequest {
                bucket: bucket.to_string(),
                object: key.to_string(),
                ..Default::default()
            };

            // A missing object is a failure here, reported as GCS_DELETE_ERROR
            self.client
                .delete_object(&req)
                .await
                .map_err(|e| anyhow!("GCS delete error: {}", e))?;

            debug!(key = %key, "Successfully deleted object from GCS");
            Ok(())
        }
    }

    impl fmt::Debug for GcsObjectClient {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("GcsObjectClient").finish_non_exhaustive()
        }
    }
}
