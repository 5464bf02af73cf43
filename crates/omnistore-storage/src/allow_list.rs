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
//! MIME allow-list enforcement
//!
//! The check runs before any file read or network call. Path uploads are
//! judged by the MIME type looked up from the file extension; buffer uploads
//! by the type the caller declares.

use crate::error::{StorageError, StorageResult};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Optional set of accepted MIME types
///
/// An absent list accepts everything. An empty list accepts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    types: Option<HashSet<String>>,
}

impl AllowList {
    /// Build from the `allowedFileTypes` configuration value
    pub fn new(types: Option<Vec<String>>) -> Self {
        AllowList {
            types: types.map(|types| types.into_iter().collect()),
        }
    }

    /// Accept every file type
    pub fn unrestricted() -> Self {
        AllowList::default()
    }

    /// Whether a list is configured
    pub fn is_restricted(&self) -> bool {
        self.types.is_some()
    }

    /// Check whether a MIME type passes
    pub fn permits(&self, mime: &str) -> bool {
        match &self.types {
            Some(types) => types.contains(mime),
            None => true,
        }
    }

    /// Check a path upload, returning the detected content type
    pub fn check_path(&self, path: &Path) -> StorageResult<Option<String>> {
        let mime = mime_for_path(path);
        if self.is_restricted() && !mime.as_deref().is_some_and(|m| self.permits(m)) {
            warn!(
                path = %path.display(),
                mime = mime.as_deref().unwrap_or("unknown"),
                "Rejected file type"
            );
            return Err(StorageError::UnsupportedFileType(mime));
        }
        Ok(mime)
    }

    /// Check the declared type of a buffer upload
    pub fn check_declared(&self, mime: &str) -> StorageResult<()> {
        if !self.permits(mime) {
            warn!(mime = %mime, "Rejected file type");
            return Err(StorageError::UnsupportedFileType(Some(mime.to_string())));
        }
        Ok(())
    }
}

/// MIME type registered for the path's extension
pub fn mime_for_path(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn images() -> AllowList {
        AllowList::new(Some(vec!["image/png".into(), "image/jpeg".into()]))
    }

    #[test]
    fn test_mime_lookup() {
        assert_eq!(mime_for_path(Path::new("a.png")).as_deref(), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("dir/b.JPG")).as_deref(), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("c.json")).as_deref(), Some("application/json"));
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_unrestricted_accepts_everything() {
        let list = AllowList::unrestricted();
        assert_eq!(list.check_path(Path::new("x.unknownext")).unwrap(), None);
        assert!(list.check_declared("application/x-anything").is_ok());
    }

    #[test]
    fn test_path_check() {
        let list = images();
        assert_eq!(
            list.check_path(Path::new("photo.png")).unwrap().as_deref(),
            Some("image/png")
        );

        let err = list.check_path(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedFileType(Some(ref m)) if m == "text/plain"));

        let err = list.check_path(Path::new("mystery")).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedFileType(None)));
    }

    #[test]
    fn test_declared_check() {
        let list = images();
        assert!(list.check_declared("image/jpeg").is_ok());
        assert!(list.check_declared("image/gif").unwrap_err().is_unsupported_file_type());
    }

    #[test]
    fn test_empty_list_rejects_all() {
        let list = AllowList::new(Some(Vec::new()));
        assert!(list.check_declared("image/png").is_err());
        assert!(list.check_path(Path::new("a.png")).is_err());
    }
}
