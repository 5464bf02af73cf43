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
//! Object key derivation
//!
//! - Path uploads default to the file's base name.
//! - Buffer uploads default to 32 random hex characters plus the original
//!   extension.
//! - Folder uploads are placed under `{folder}/`, with trailing slashes on the
//!   folder name collapsed so `"reports"` and `"reports/"` agree.

use crate::error::{StorageError, StorageResult};
use std::path::Path;

/// Random bytes behind a generated object name (hex-encoded to 32 chars)
pub const RANDOM_NAME_BYTES: usize = 16;

/// Generate a collision-resistant key keeping the extension of `original_name`
pub fn random_object_name(original_name: &str) -> String {
    let bytes: [u8; RANDOM_NAME_BYTES] = rand::random();
    format!("{}{}", hex::encode(bytes), extension_of(original_name))
}

/// Extension including the leading dot, or an empty string
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Final path component, used as the default object key
pub fn base_name(path: &Path) -> StorageResult<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            StorageError::invalid_key(format!("'{}' has no file name", path.display()))
        })
}

/// Strip trailing slashes from a folder name
pub fn normalize_folder(name: &str) -> StorageResult<&str> {
    let folder = name.trim_end_matches('/');
    if folder.is_empty() {
        return Err(StorageError::invalid_key("folder name cannot be empty"));
    }
    Ok(folder)
}

/// Key of `file_name` inside `folder`
pub fn folder_object_key(folder: &str, file_name: &str) -> StorageResult<String> {
    if file_name.is_empty() {
        return Err(StorageError::invalid_key("file name cannot be empty"));
    }
    Ok(format!("{}/{}", normalize_folder(folder)?, file_name))
}

/// Reject keys no vendor accepts
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key("key cannot be empty"));
    }
    Ok(())
}
