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
//! Provider selection and the public storage facade

use crate::allow_list::AllowList;
use crate::error::StorageResult;
use crate::gcs::GcsProvider;
use crate::s3::S3Provider;
use crate::spaces::DoSpacesProvider;
use crate::types::{BufferFileInfo, FileInfo, FileUploadOptions};
use crate::StorageProvider;
use async_trait::async_trait;
use omnistore_config::{
    parse_cloud_storage_config, CloudStorageConfig, ProviderConfig, ProviderKind,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// The closed set of provider adapters
#[derive(Debug, Clone)]
pub enum Provider {
    /// Google Cloud Storage
    Gcs(GcsProvider),
    /// Amazon S3
    S3(S3Provider),
    /// DigitalOcean Spaces
    DoSpaces(DoSpacesProvider),
}

impl Provider {
    /// Validate `config` and build the matching adapter
    ///
    /// Fails with
    /// [`StorageError::UnsupportedProvider`](crate::StorageError::UnsupportedProvider)
    /// for tags without an adapter, including the reserved `cloudinary`.
    pub async fn from_config(config: &CloudStorageConfig) -> StorageResult<Self> {
        let resolved = config.validated_provider_config()?;
        let allowed = AllowList::new(config.allowed_file_types.clone());

        match resolved {
            #[cfg(feature = "gcs")]
            ProviderConfig::Gcs(gcs) => Ok(Provider::Gcs(GcsProvider::new(&gcs, allowed).await?)),
            #[cfg(not(feature = "gcs"))]
            ProviderConfig::Gcs(_) => Err(crate::StorageError::UnsupportedProvider(
                "gcs (built without the `gcs` feature)".to_string(),
            )),
            ProviderConfig::S3(s3) => Ok(Provider::S3(S3Provider::new(&s3, allowed).await)),
            ProviderConfig::DoSpaces(spaces) => Ok(Provider::DoSpaces(
                DoSpacesProvider::new(&spaces, allowed).await,
            )),
        }
    }

    fn inner(&self) -> &dyn StorageProvider {
        match self {
            Provider::Gcs(provider) => provider,
            Provider::S3(provider) => provider,
            Provider::DoSpaces(provider) => provider,
        }
    }
}

impl From<GcsProvider> for Provider {
    fn from(provider: GcsProvider) -> Self {
        Provider::Gcs(provider)
    }
}

impl From<S3Provider> for Provider {
    fn from(provider: S3Provider) -> Self {
        Provider::S3(provider)
    }
}

impl From<DoSpacesProvider> for Provider {
    fn from(provider: DoSpacesProvider) -> Self {
        Provider::DoSpaces(provider)
    }
}

#[async_trait]
impl StorageProvider for Provider {
    fn kind(&self) -> ProviderKind {
        self.inner().kind()
    }

    fn bucket(&self) -> &str {
        self.inner().bucket()
    }

    async fn upload(&self, path: &Path, options: &FileUploadOptions) -> StorageResult<FileInfo> {
        self.inner().upload(path, options).await
    }

    async fn upload_buffer(
        &self,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        self.inner().upload_buffer(file, options).await
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.inner().delete(id).await
    }

    async fn create_folder(&self, name: &str) -> StorageResult<()> {
        self.inner().create_folder(name).await
    }
}

/// Provider-agnostic storage handle
///
/// Holds exactly one adapter, chosen once at [`init`](CloudStorage::init).
/// Every operation is forwarded to it unchanged. Cloning is cheap and clones
/// share the underlying vendor client.
#[derive(Debug, Clone)]
pub struct CloudStorage {
    provider: Provider,
}

impl CloudStorage {
    /// Validate the configuration and connect to the configured bucket
    ///
    /// No network request is made; credentials are first exercised by the
    /// first operation.
    pub async fn init(config: &CloudStorageConfig) -> StorageResult<Self> {
        let provider = Provider::from_config(config).await?;
        info!(
            provider = %provider.kind(),
            bucket = %provider.bucket(),
            "Cloud storage initialized"
        );
        Ok(CloudStorage { provider })
    }

    /// Validate an untyped configuration value, then [`init`](CloudStorage::init)
    pub async fn init_from_value(config: Value) -> StorageResult<Self> {
        let config = parse_cloud_storage_config(config)?;
        Self::init(&config).await
    }

    /// Wrap an already constructed adapter
    pub fn from_provider(provider: impl Into<Provider>) -> Self {
        CloudStorage {
            provider: provider.into(),
        }
    }

    /// Selected adapter
    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Tag of the selected provider
    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Configured bucket
    pub fn bucket(&self) -> &str {
        self.provider.bucket()
    }

    /// Upload a local file
    pub async fn upload(
        &self,
        path: impl AsRef<Path>,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        self.provider.upload(path.as_ref(), options).await
    }

    /// Upload several local files concurrently; results are in input order
    pub async fn upload_bulk(
        &self,
        paths: &[PathBuf],
        options: &FileUploadOptions,
    ) -> StorageResult<Vec<FileInfo>> {
        self.provider.upload_bulk(paths, options).await
    }

    /// Upload an in-memory buffer
    pub async fn upload_buffer(
        &self,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        self.provider.upload_buffer(file, options).await
    }

    /// Upload several buffers concurrently; results are in input order
    pub async fn upload_bulk_buffer(
        &self,
        files: &[BufferFileInfo],
        options: &FileUploadOptions,
    ) -> StorageResult<Vec<FileInfo>> {
        self.provider.upload_bulk_buffer(files, options).await
    }

    /// Remove an object
    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.provider.delete(id).await
    }

    /// Remove several objects concurrently
    pub async fn delete_bulk(&self, ids: &[String]) -> StorageResult<()> {
        self.provider.delete_bulk(ids).await
    }

    /// Create a folder marker
    pub async fn create_folder(&self, name: &str) -> StorageResult<()> {
        self.provider.create_folder(name).await
    }

    /// Upload a local file into `folder`
    pub async fn upload_to_folder(
        &self,
        folder: &str,
        path: impl AsRef<Path>,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        self.provider
            .upload_to_folder(folder, path.as_ref(), options)
            .await
    }

    /// Upload a buffer into `folder`
    pub async fn upload_buffer_to_folder(
        &self,
        folder: &str,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        self.provider
            .upload_buffer_to_folder(folder, file, options)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::MemoryObjectClient;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_init_s3() {
        let config = CloudStorageConfig::new(
            ProviderKind::S3,
            json!({
                "region": "us-east-1",
                "bucketName": "media",
                "accessKeyId": "AKIA",
                "secretAccessKey": "secret"
            }),
        );
        let storage = CloudStorage::init(&config).await.unwrap();
        assert_eq!(storage.provider_kind(), ProviderKind::S3);
        assert_eq!(storage.bucket(), "media");
        assert!(matches!(storage.provider(), Provider::S3(_)));
    }

    #[tokio::test]
    async fn test_init_cloudinary_unsupported() {
        let config = CloudStorageConfig::new(ProviderKind::Cloudinary, json!({ "cloudName": "x" }));
        let err = CloudStorage::init(&config).await.unwrap_err();
        assert!(err.is_unsupported_provider());
    }

    #[tokio::test]
    async fn test_init_from_value_unknown_tag() {
        let err = CloudStorage::init_from_value(json!({ "provider": "azure", "config": {} }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_PROVIDER");
    }

    #[tokio::test]
    async fn test_init_invalid_config() {
        let config = CloudStorageConfig::new(ProviderKind::S3, json!({ "region": "us-east-1" }));
        let err = CloudStorage::init(&config).await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_init_rejects_bad_allow_list() {
        let config = CloudStorageConfig::new(
            ProviderKind::S3,
            json!({
                "region": "us-east-1",
                "bucketName": "media",
                "accessKeyId": "AKIA",
                "secretAccessKey": "secret"
            }),
        )
        .with_allowed_file_types(["image/png", "png"]);
        let err = CloudStorage::init(&config).await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_from_provider_forwards() {
        let client = MemoryObjectClient::new();
        let storage = CloudStorage::from_provider(GcsProvider::with_client(
            "bucket",
            Arc::new(client.clone()),
            AllowList::unrestricted(),
        ));

        storage.create_folder("x").await.unwrap();
        storage.delete("x/.placeholder").await.unwrap();
        assert!(client.is_empty().await);
        assert_eq!(storage.provider_kind(), ProviderKind::Gcs);
    }
}
