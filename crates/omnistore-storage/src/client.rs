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
//! Vendor seam
//!
//! Adapters talk to a bucket through [`ObjectClient`]. The production
//! implementations wrap the AWS S3 SDK (S3 and DigitalOcean Spaces) and the
//! Google Cloud Storage client; tests plug in
//! [`MemoryObjectClient`](crate::mock::MemoryObjectClient).

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Debug;

/// A single object write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutObject {
    /// Object key inside the bucket
    pub key: String,
    /// Object contents
    pub body: Bytes,
    /// MIME type recorded on the object
    pub content_type: Option<String>,
    /// User metadata, attached as string pairs
    pub metadata: HashMap<String, String>,
}

impl PutObject {
    /// Create a write with no content type or metadata
    pub fn new(key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        PutObject {
            key: key.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Attach caller metadata
    ///
    /// Vendors only store string values, so non-string JSON values are
    /// written in their JSON text form.
    pub fn with_metadata(mut self, metadata: Option<&Map<String, Value>>) -> Self {
        if let Some(metadata) = metadata {
            self.metadata = metadata
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), value)
                })
                .collect();
        }
        self
    }
}

/// Minimal object-store client used by the provider adapters
///
/// Implementations must be thread-safe (`Send + Sync`); one client is shared by
/// every concurrent call of a facade instance.
#[async_trait]
pub trait ObjectClient: Send + Sync + Debug {
    /// Write one object, returning vendor metadata for the stored object if
    /// the vendor reports any
    async fn put_object(&self, bucket: &str, object: PutObject) -> anyhow::Result<Option<Value>>;

    /// Remove one object
    async fn delete_object(&self, bucket: &str, key: &str) -> anyhow::Result<()>;
}
