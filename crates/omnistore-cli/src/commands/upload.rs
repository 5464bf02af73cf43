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
//! `omnistore upload`

use super::{parse_key_val, upload_options};
use crate::output;
use anyhow::{bail, Result};
use clap::Parser;
use futures::future::join_all;
use omnistore_storage::CloudStorage;
use std::path::PathBuf;
use tracing::info;

/// Upload local files
#[derive(Parser, Debug)]
pub struct UploadCmd {
    /// Files to upload
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Object key to write (single file only)
    #[arg(long, value_name = "KEY")]
    pub dest: Option<String>,

    /// Folder to upload into
    #[arg(long, value_name = "FOLDER")]
    pub folder: Option<String>,

    /// Metadata to attach, repeatable
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub meta: Vec<(String, String)>,
}

impl UploadCmd {
    /// Run the upload and print the resulting descriptors
    pub async fn execute(&self, storage: &CloudStorage) -> Result<()> {
        if self.dest.is_some() && self.paths.len() > 1 {
            bail!("--dest can only be used with a single file");
        }

        let options = upload_options(self.dest.as_deref(), &self.meta);
        let infos = match &self.folder {
            // Every upload runs to completion before the first error is reported
            Some(folder) => join_all(
                self.paths
                    .iter()
                    .map(|path| storage.upload_to_folder(folder, path, &options)),
            )
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?,
            None => storage.upload_bulk(&self.paths, &options).await?,
        };

        info!(count = infos.len(), provider = %storage.provider_kind(), "Uploaded files");

        match infos.as_slice() {
            [single] => output::json(single),
            many => output::json(many),
        }
    }
}
