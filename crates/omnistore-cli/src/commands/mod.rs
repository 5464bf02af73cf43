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
//! Subcommand implementations

pub mod delete;
pub mod mkdir;
pub mod put;
pub mod upload;

pub use delete::DeleteCmd;
pub use mkdir::MkdirCmd;
pub use put::PutCmd;
pub use upload::UploadCmd;

use anyhow::{anyhow, Result};
use omnistore_storage::FileUploadOptions;

/// Parse a `key=value` metadata argument
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid metadata '{}': expected KEY=VALUE", s))?;
    if key.is_empty() {
        return Err(anyhow!("invalid metadata '{}': empty key", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Build upload options from the shared `--dest` and `--meta` flags
pub fn upload_options(dest: Option<&str>, meta: &[(String, String)]) -> FileUploadOptions {
    let mut options = FileUploadOptions::new();
    if let Some(dest) = dest {
        options = options.with_destination(dest);
    }
    for (key, value) in meta {
        options = options.with_metadata(key.as_str(), value.as_str());
    }
    options
}
