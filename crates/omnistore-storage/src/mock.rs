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
//! In-memory doubles for testing
//!
//! [`MemoryObjectClient`] is a thread-safe, in-memory [`ObjectClient`] using
//! `Arc<RwLock<HashMap>>` for concurrent access, with failure injection by
//! key. [`MemoryFileSource`] serves path uploads from a fixed set of files.
//!
//! # Examples
//!
//! ```rust,no_run
//! use omnistore_storage::mock::{MemoryFileSource, MemoryObjectClient};
//! use omnistore_storage::{AllowList, FileUploadOptions, S3Provider, StorageProvider};
//! use omnistore_config::S3Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = MemoryObjectClient::new();
//!     let files = MemoryFileSource::new().with_file("report.pdf", &b"%PDF"[..]);
//!     let config = S3Config {
//!         region: "us-east-1".into(),
//!         bucket_name: "media".into(),
//!         access_key_id: "key".into(),
//!         secret_access_key: "secret".into(),
//!     };
//!
//!     let provider = S3Provider::with_client(&config, Arc::new(client.clone()), AllowList::unrestricted())
//!         .with_file_source(Arc::new(files));
//!     provider.upload("report.pdf".as_ref(), &FileUploadOptions::default()).await?;
//!
//!     assert!(client.contains("media", "report.pdf").await);
//!     Ok(())
//! }
//! ```

use crate::client::{ObjectClient, PutObject};
use crate::files::FileSource;
use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// An object held by [`MemoryObjectClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryObject {
    /// Stored bytes
    pub body: Bytes,
    /// Recorded content type
    pub content_type: Option<String>,
    /// Recorded user metadata
    pub metadata: HashMap<String, String>,
}

/// In-memory object store for testing
///
/// Objects are keyed by `(bucket, key)`. Clones share the same store.
#[derive(Clone, Default)]
pub struct MemoryObjectClient {
    store: Arc<RwLock<HashMap<(String, String), MemoryObject>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    put_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    put_delay: Option<Duration>,
    omit_object_metadata: bool,
    fail_missing_deletes: bool,
}

impl MemoryObjectClient {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `delay` before storing each object
    pub fn with_put_delay(mut self, delay: Duration) -> Self {
        self.put_delay = Some(delay);
        self
    }

    /// Choose whether `put_object` reports object metadata
    ///
    /// On by default, like the GCS client. The S3 client reports none.
    pub fn with_object_metadata(mut self, enabled: bool) -> Self {
        self.omit_object_metadata = !enabled;
        self
    }

    /// Choose whether deleting a missing key fails
    ///
    /// Off by default, like S3. GCS rejects such deletes with 404.
    pub fn with_missing_deletes_failing(mut self, enabled: bool) -> Self {
        self.fail_missing_deletes = enabled;
        self
    }

    /// Make every put or delete of `key` fail
    pub async fn fail_on(&self, key: impl Into<String>) {
        self.failing.write().await.insert(key.into());
    }

    /// Fetch a stored object
    pub async fn get(&self, bucket: &str, key: &str) -> Option<MemoryObject> {
        self.store
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Check whether an object exists
    pub async fn contains(&self, bucket: &str, key: &str) -> bool {
        self.store
            .read()
            .await
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Sorted keys stored in `bucket`
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .store
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Get the current number of objects stored
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Number of `put_object` calls received, failed ones included
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete_object` calls received, failed ones included
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    async fn check_failure(&self, key: &str) -> anyhow::Result<()> {
        if self.failing.read().await.contains(key) {
            return Err(anyhow!("injected failure for key '{}'", key));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectClient for MemoryObjectClient {
    async fn put_object(&self, bucket: &str, object: PutObject) -> anyhow::Result<Option<Value>> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(&object.key).await?;
        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }

        let metadata = json!({
            "bucket": bucket,
            "name": object.key,
            "size": object.body.len(),
            "contentType": object.content_type,
        });

        self.store.write().await.insert(
            (bucket.to_string(), object.key),
            MemoryObject {
                body: object.body,
                content_type: object.content_type,
                metadata: object.metadata,
            },
        );
        Ok((!self.omit_object_metadata).then_some(metadata))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> anyhow::Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(key).await?;

        let removed = self
            .store
            .write()
            .await
            .remove(&(bucket.to_string(), key.to_string()));
        if removed.is_none() && self.fail_missing_deletes {
            return Err(anyhow!("object '{}' not found in bucket '{}'", key, bucket));
        }
        Ok(())
    }
}

impl fmt::Debug for MemoryObjectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryObjectClient")
            .field("put_calls", &self.put_calls())
            .field("delete_calls", &self.delete_calls())
            .finish()
    }
}

/// Fixed set of files for path uploads
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSource {
    files: HashMap<PathBuf, Bytes>,
}

impl MemoryFileSource {
    /// Create an empty source; every read fails with `NotFound`
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Bytes>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

#[async_trait]
impl FileSource for MemoryFileSource {
    async fn read(&self, path: &Path) -> std::io::Result<Bytes> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}
