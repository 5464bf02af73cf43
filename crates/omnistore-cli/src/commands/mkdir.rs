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
//! `omnistore mkdir`

use crate::output;
use anyhow::Result;
use clap::Parser;
use omnistore_storage::CloudStorage;

/// Create a folder marker
#[derive(Parser, Debug)]
pub struct MkdirCmd {
    /// Folder name; a trailing slash is ignored
    #[arg(value_name = "NAME")]
    pub name: String,
}

impl MkdirCmd {
    /// Create the folder
    pub async fn execute(&self, storage: &CloudStorage, quiet: bool) -> Result<()> {
        storage.create_folder(&self.name).await?;

        if !quiet {
            output::success(&format!(
                "Folder '{}' ready in {} bucket '{}'",
                self.name.trim_end_matches('/'),
                storage.provider_kind().display_name(),
                storage.bucket()
            ));
        }
        Ok(())
    }
}
