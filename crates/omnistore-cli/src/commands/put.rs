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
//! `omnistore put`: upload bytes read from stdin or a file

use super::{parse_key_val, upload_options};
use crate::output;
use anyhow::{Context, Result};
use clap::Parser;
use omnistore_storage::{BufferFileInfo, CloudStorage};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Upload an in-memory buffer
#[derive(Parser, Debug)]
pub struct PutCmd {
    /// Client-side file name; its extension is kept on generated keys
    #[arg(value_name = "NAME")]
    pub name: String,

    /// MIME type of the content
    #[arg(long, value_name = "MIME")]
    pub content_type: String,

    /// Read content from this file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Object key to write; defaults to a random name
    #[arg(long, value_name = "KEY")]
    pub dest: Option<String>,

    /// Folder to upload into
    #[arg(long, value_name = "FOLDER")]
    pub folder: Option<String>,

    /// Metadata to attach, repeatable
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub meta: Vec<(String, String)>,
}

impl PutCmd {
    /// Read the content, upload it and print the descriptor
    pub async fn execute(&self, storage: &CloudStorage) -> Result<()> {
        let buffer = match &self.input {
            Some(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut buffer = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut buffer)
                    .await
                    .context("Failed to read stdin")?;
                buffer
            }
        };

        let file = BufferFileInfo::new(buffer, self.name.as_str(), self.content_type.as_str());
        let options = upload_options(self.dest.as_deref(), &self.meta);

        let info = match &self.folder {
            Some(folder) => {
                storage
                    .upload_buffer_to_folder(folder, &file, &options)
                    .await?
            }
            None => storage.upload_buffer(&file, &options).await?,
        };

        output::json(&info)
    }
}
