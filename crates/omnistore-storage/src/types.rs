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
//! Values exchanged with the storage facade

use bytes::Bytes;
use omnistore_config::ProviderKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use omnistore_config::FileUploadOptions;

/// Descriptor of an uploaded object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Object key inside the bucket
    pub id: String,
    /// Public URL derived from the vendor's URL template
    pub url: String,
    /// Provider that stored the object
    pub provider: ProviderKind,
    /// Vendor-specific metadata returned by the upload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl FileInfo {
    /// Create a descriptor without vendor metadata
    pub fn new(id: impl Into<String>, url: impl Into<String>, provider: ProviderKind) -> Self {
        FileInfo {
            id: id.into(),
            url: url.into(),
            provider,
            metadata: None,
        }
    }

    /// Attach vendor metadata
    pub fn with_metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// An in-memory file to upload
#[derive(Clone, PartialEq, Eq)]
pub struct BufferFileInfo {
    /// File contents
    pub buffer: Bytes,
    /// Name the file had on the client side; its extension is kept on random names
    pub original_name: String,
    /// Declared MIME type, checked against the allow-list
    pub mime_type: String,
}

impl BufferFileInfo {
    /// Wrap bytes with their client-side name and declared MIME type
    pub fn new(
        buffer: impl Into<Bytes>,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        BufferFileInfo {
            buffer: buffer.into(),
            original_name: original_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Buffer size in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl fmt::Debug for BufferFileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferFileInfo")
            .field("buffer", &format_args!("<{} bytes>", self.buffer.len()))
            .field("original_name", &self.original_name)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}
