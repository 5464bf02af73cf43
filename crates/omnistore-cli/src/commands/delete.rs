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
//! `omnistore delete`

use crate::output;
use anyhow::Result;
use clap::Parser;
use omnistore_storage::CloudStorage;

/// Delete objects by key
#[derive(Parser, Debug)]
pub struct DeleteCmd {
    /// Object keys to delete
    #[arg(required = true, value_name = "KEY")]
    pub ids: Vec<String>,
}

impl DeleteCmd {
    /// Delete every key concurrently
    pub async fn execute(&self, storage: &CloudStorage, quiet: bool) -> Result<()> {
        storage.delete_bulk(&self.ids).await?;

        if !quiet {
            output::success(&format!("Deleted {} object(s)", self.ids.len()));
            for id in &self.ids {
                output::detail("key", id);
            }
        }
        Ok(())
    }
}
