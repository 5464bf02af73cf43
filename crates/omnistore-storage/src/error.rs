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
//! Error types for storage operations
//!
//! Every failure surfaced by the facade is a [`StorageError`]. Callers that
//! need a stable machine-readable identifier use [`StorageError::code`], which
//! yields `VALIDATION_ERROR`, `UNSUPPORTED_PROVIDER`, `UNSUPPORTED_FILE_TYPE`,
//! `INVALID_KEY` or a vendor/operation code such as `S3_UPLOAD_ERROR`.

use omnistore_config::{ConfigError, ProviderKind};
use std::fmt;
use thiserror::Error;

/// The adapter operation a vendor failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Upload from a local path
    Upload,
    /// Upload from an in-memory buffer
    UploadBuffer,
    /// Object removal
    Delete,
    /// Folder marker write
    CreateFolder,
}

impl Operation {
    /// Segment used inside error codes
    pub fn code(&self) -> &'static str {
        match self {
            Operation::Upload => "UPLOAD",
            Operation::UploadBuffer => "UPLOAD_BUFFER",
            Operation::Delete => "DELETE",
            Operation::CreateFolder => "CREATEFOLDER",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Upload => "upload",
            Operation::UploadBuffer => "buffer upload",
            Operation::Delete => "delete",
            Operation::CreateFolder => "create folder",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Configuration or per-call options failed schema validation
    #[error("invalid configuration: {0}")]
    Config(#[source] ConfigError),

    /// Provider tag has no adapter (including the reserved `cloudinary`)
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// File type is not in the configured allow-list
    ///
    /// Holds the detected MIME type, `None` when the extension is unknown.
    #[error("invalid file type: {}", .0.as_deref().unwrap_or("unknown"))]
    UnsupportedFileType(Option<String>),

    /// Object key or folder name is unusable (empty, no file name, ...)
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Vendor SDK or local file read failure inside an adapter operation
    #[error("{} {} failed: {source:#}", .provider.display_name(), .operation)]
    Provider {
        /// Provider whose adapter failed
        provider: ProviderKind,
        /// Operation that failed
        operation: Operation,
        /// Underlying failure
        source: anyhow::Error,
    },
}

impl From<ConfigError> for StorageError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnsupportedProvider(tag) => StorageError::UnsupportedProvider(tag),
            other => StorageError::Config(other),
        }
    }
}

impl StorageError {
    /// Create an InvalidKey error with context
    pub fn invalid_key<S: Into<String>>(msg: S) -> Self {
        StorageError::InvalidKey(msg.into())
    }

    /// Wrap a vendor or I/O failure for the given provider and operation
    pub fn provider<E>(provider: ProviderKind, operation: Operation, err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        StorageError::Provider {
            provider,
            operation,
            source: err.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> String {
        match self {
            StorageError::Config(_) => "VALIDATION_ERROR".to_string(),
            StorageError::UnsupportedProvider(_) => "UNSUPPORTED_PROVIDER".to_string(),
            StorageError::UnsupportedFileType(_) => "UNSUPPORTED_FILE_TYPE".to_string(),
            StorageError::InvalidKey(_) => "INVALID_KEY".to_string(),
            StorageError::Provider {
                provider,
                operation,
                ..
            } => format!("{}_{}_ERROR", vendor_prefix(*provider), operation.code()),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Config(_))
    }

    /// Check if this is an unsupported provider error
    pub fn is_unsupported_provider(&self) -> bool {
        matches!(self, StorageError::UnsupportedProvider(_))
    }

    /// Check if the file type was rejected by the allow-list
    pub fn is_unsupported_file_type(&self) -> bool {
        matches!(self, StorageError::UnsupportedFileType(_))
    }

    /// Check if this wraps a vendor failure
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, StorageError::Provider { .. })
    }
}

fn vendor_prefix(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Gcs => "GCS",
        ProviderKind::S3 => "S3",
        ProviderKind::DoSpaces => "DO_SPACES",
        ProviderKind::Cloudinary => "CLOUDINARY",
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
