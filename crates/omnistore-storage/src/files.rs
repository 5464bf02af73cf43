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
//! Local file access for path uploads

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;
use std::path::Path;

/// Reads the bytes of a file named by an upload path
#[async_trait]
pub trait FileSource: Send + Sync + Debug {
    /// Read the whole file
    async fn read(&self, path: &Path) -> std::io::Result<Bytes>;
}

/// Reads from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileSource;

#[async_trait]
impl FileSource for FsFileSource {
    async fn read(&self, path: &Path) -> std::io::Result<Bytes> {
        tokio::fs::read(path).await.map(Bytes::from)
    }
}
