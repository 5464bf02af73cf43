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
//! Storage configuration resolution for the CLI

use anyhow::{Context, Result};
use omnistore_config::{CloudStorageConfig, ConfigLoader};
use std::path::Path;
use tracing::debug;

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "OMNISTORE_CONFIG";

/// Load the storage configuration
///
/// Order: the `--config` file, then the file named by `OMNISTORE_CONFIG`,
/// then `OMNISTORE_*` variables alone. Environment overrides apply on top of
/// a file.
pub async fn load_config(path: Option<&Path>) -> Result<CloudStorageConfig> {
    let loader = ConfigLoader::new();
    let from_env = std::env::var(CONFIG_ENV_VAR).ok();

    match path.or(from_env.as_deref().map(Path::new)) {
        Some(path) => {
            debug!(path = %path.display(), "Loading storage configuration file");
            loader
                .load_with_overrides(path)
                .await
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => {
            debug!("Loading storage configuration from environment");
            loader
                .from_env()
                .await
                .context("Failed to load configuration from OMNISTORE_* environment variables")
        }
    }
}
