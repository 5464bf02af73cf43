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
//! Provider-agnostic object storage for Omnistore
//!
//! One API, three backends: Google Cloud Storage, Amazon S3 and DigitalOcean
//! Spaces. Pick the backend with a validated
//! [`CloudStorageConfig`](omnistore_config::CloudStorageConfig) and call the
//! same operations regardless of vendor.
//!
//! # Architecture
//!
//! - [`CloudStorage`]: facade built by [`CloudStorage::init`]
//! - [`Provider`]: closed set of adapters the facade dispatches to
//! - [`StorageProvider`]: the operation contract every adapter fulfils
//! - [`ObjectClient`]: the vendor seam; SDK clients in production,
//!   [`mock::MemoryObjectClient`] in tests
//!
//! # Features
//!
//! - `gcs` (default): Google Cloud Storage client. Without it a `gcs`
//!   configuration fails with [`StorageError::UnsupportedProvider`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use omnistore_config::{CloudStorageConfig, ProviderKind};
//! use omnistore_storage::{BufferFileInfo, CloudStorage, FileUploadOptions};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CloudStorageConfig::new(
//!         ProviderKind::S3,
//!         json!({
//!             "region": "us-east-1",
//!             "bucketName": "media-assets",
//!             "accessKeyId": "AKIA...",
//!             "secretAccessKey": "..."
//!         }),
//!     )
//!     .with_allowed_file_types(["image/png", "image/jpeg"]);
//!
//!     let storage = CloudStorage::init(&config).await?;
//!
//!     let info = storage.upload("photos/cat.png", &FileUploadOptions::default()).await?;
//!     println!("stored at {}", info.url);
//!
//!     let file = BufferFileInfo::new(vec![0u8; 16], "thumb.png", "image/png");
//!     let info = storage
//!         .upload_buffer_to_folder("thumbnails", &file, &FileUploadOptions::default())
//!         .await?;
//!     storage.delete(&info.id).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod allow_list;
pub mod client;
pub mod error;
pub mod files;
pub mod gcs;
pub mod keys;
pub mod mock;
pub mod s3;
pub mod spaces;
pub mod storage;
pub mod target;
pub mod types;

use async_trait::async_trait;
use futures::future::join_all;
use omnistore_config::{ProviderKind, Validator};
use std::fmt::Debug;
use std::future::Future;
use std::path::{Path, PathBuf};

pub use allow_list::AllowList;
pub use client::{ObjectClient, PutObject};
pub use error::{Operation, StorageError, StorageResult};
pub use files::{FileSource, FsFileSource};
pub use gcs::GcsProvider;
pub use s3::{S3ObjectClient, S3Provider};
pub use spaces::DoSpacesProvider;
pub use storage::{CloudStorage, Provider};
pub use types::{BufferFileInfo, FileInfo, FileUploadOptions};

#[cfg(feature = "gcs")]
pub use gcs::GcsObjectClient;

/// Storage operations offered by every provider adapter
///
/// Adapters implement the four single-object operations; bulk and folder
/// variants are provided on top of them.
///
/// # Concurrency
///
/// Bulk operations start every item at once. A failing item does not stop
/// its siblings: every call that was issued runs to completion, then the
/// first error in input order is returned. Items already written stay
/// written.
///
/// # Errors
///
/// - Invalid options: [`StorageError::Config`], before any I/O
/// - Rejected file type: [`StorageError::UnsupportedFileType`], before any I/O
/// - Empty key or folder name: [`StorageError::InvalidKey`]
/// - Vendor or file read failure: [`StorageError::Provider`]
///
/// # Examples
///
/// ```rust,no_run
/// # use omnistore_storage::{mock::MemoryObjectClient, AllowList, GcsProvider, StorageProvider};
/// # use std::sync::Arc;
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let provider: Box<dyn StorageProvider> = Box::new(GcsProvider::with_client(
///     "photos",
///     Arc::new(MemoryObjectClient::new()),
///     AllowList::unrestricted(),
/// ));
///
/// provider.create_folder("albums/2024").await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait StorageProvider: Send + Sync + Debug {
    /// Provider tag of this adapter
    fn kind(&self) -> ProviderKind;

    /// Bucket this adapter writes to
    fn bucket(&self) -> &str;

    /// Upload a local file
    ///
    /// The key is `options.destination`, or the file's base name.
    async fn upload(&self, path: &Path, options: &FileUploadOptions) -> StorageResult<FileInfo>;

    /// Upload an in-memory buffer
    ///
    /// The key is `options.destination`, or 32 random hex characters followed
    /// by the extension of `file.original_name`.
    async fn upload_buffer(
        &self,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo>;

    /// Remove an object by key
    ///
    /// Whether removing a missing object fails is up to the vendor: S3 and
    /// Spaces accept it, GCS reports a delete error.
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Create a folder marker object
    ///
    /// Idempotent; `"name"` and `"name/"` address the same folder.
    async fn create_folder(&self, name: &str) -> StorageResult<()>;

    /// Upload several local files concurrently
    ///
    /// Results are in input order.
    async fn upload_bulk(
        &self,
        paths: &[PathBuf],
        options: &FileUploadOptions,
    ) -> StorageResult<Vec<FileInfo>> {
        settle_all(paths.iter().map(|path| self.upload(path, options))).await
    }

    /// Upload several buffers concurrently
    ///
    /// Without a destination each buffer gets its own random key.
    async fn upload_bulk_buffer(
        &self,
        files: &[BufferFileInfo],
        options: &FileUploadOptions,
    ) -> StorageResult<Vec<FileInfo>> {
        settle_all(files.iter().map(|file| self.upload_buffer(file, options))).await
    }

    /// Remove several objects concurrently
    async fn delete_bulk(&self, ids: &[String]) -> StorageResult<()> {
        settle_all(ids.iter().map(|id| self.delete(id))).await?;
        Ok(())
    }

    /// Upload a local file into `folder`
    ///
    /// The key is `{folder}/{name}`, where `name` is the base name of
    /// `options.destination` if given, else of `path`.
    async fn upload_to_folder(
        &self,
        folder: &str,
        path: &Path,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        options.validate()?;
        let name = match &options.destination {
            Some(destination) => keys::base_name(Path::new(destination))?,
            None => keys::base_name(path)?,
        };
        let options = FileUploadOptions {
            destination: Some(keys::folder_object_key(folder, &name)?),
            metadata: options.metadata.clone(),
        };
        self.upload(path, &options).await
    }

    /// Upload a buffer into `folder`
    ///
    /// The key is `{folder}/{name}`, where `name` is `options.destination` if
    /// given, else `file.original_name`.
    async fn upload_buffer_to_folder(
        &self,
        folder: &str,
        file: &BufferFileInfo,
        options: &FileUploadOptions,
    ) -> StorageResult<FileInfo> {
        options.validate()?;
        let name = options
            .destination
            .as_deref()
            .unwrap_or(&file.original_name);
        let options = FileUploadOptions {
            destination: Some(keys::folder_object_key(folder, name)?),
            metadata: options.metadata.clone(),
        };
        self.upload_buffer(file, &options).await
    }
}

/// Drive every call to completion, then report the first failure
async fn settle_all<T, F>(calls: impl IntoIterator<Item = F>) -> StorageResult<Vec<T>>
where
    F: Future<Output = StorageResult<T>>,
{
    join_all(calls).await.into_iter().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{MemoryFileSource, MemoryObjectClient};
    use std::sync::Arc;

    fn provider(client: &MemoryObjectClient) -> GcsProvider {
        let files = MemoryFileSource::new()
            .with_file("/in/a.txt", &b"a"[..])
            .with_file("/in/b.txt", &b"b"[..]);
        GcsProvider::with_client("bucket", Arc::new(client.clone()), AllowList::unrestricted())
            .with_file_source(Arc::new(files))
    }

    #[test]
    fn trait_is_object_safe() {
        fn assert_object_safe(_: &dyn StorageProvider) {}
        let provider = provider(&MemoryObjectClient::new());
        assert_object_safe(&provider);
    }

    #[tokio::test]
    async fn test_upload_bulk_preserves_order() {
        let client = MemoryObjectClient::new();
        let paths = vec![PathBuf::from("/in/b.txt"), PathBuf::from("/in/a.txt")];

        let infos = provider(&client)
            .upload_bulk(&paths, &FileUploadOptions::default())
            .await
            .unwrap();
        let ids: Vec<&str> = infos.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b.txt", "a.txt"]);
    }

    #[tokio::test]
    async fn test_upload_bulk_empty() {
        let client = MemoryObjectClient::new();
        let infos = provider(&client)
            .upload_bulk(&[], &FileUploadOptions::default())
            .await
            .unwrap();
        assert!(infos.is_empty());
        assert_eq!(client.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_to_folder_uses_destination_base_name() {
        let client = MemoryObjectClient::new();
        let options = FileUploadOptions::new().with_destination("ignored/dir/renamed.txt");

        let info = provider(&client)
            .upload_to_folder("docs/", Path::new("/in/a.txt"), &options)
            .await
            .unwrap();
        assert_eq!(info.id, "docs/renamed.txt");
    }

    #[tokio::test]
    async fn test_upload_buffer_to_folder_keeps_original_name() {
        let client = MemoryObjectClient::new();
        let file = BufferFileInfo::new(&b"x"[..], "notes.md", "text/markdown");

        let info = provider(&client)
            .upload_buffer_to_folder("docs", &file, &FileUploadOptions::default())
            .await
            .unwrap();
        assert_eq!(info.id, "docs/notes.md");
    }
}
