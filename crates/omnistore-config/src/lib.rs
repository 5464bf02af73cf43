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
//! Configuration schema and validation for Omnistore
//!
//! This crate owns the validated configuration contract of the storage
//! facade: which provider to use, its credentials blob, and the optional MIME
//! allow-list, plus the per-call upload options.
//!
//! # Features
//!
//! - Multi-format configuration files (TOML, YAML, JSON)
//! - Environment variable overrides with the `OMNISTORE_` prefix
//! - Schema validation that runs before any storage client is built
//!
//! # Example
//!
//! ```no_run
//! use omnistore_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ConfigLoader::new();
//!     let config = loader.load_with_overrides("storage.toml").await?;
//!
//!     println!("Using provider: {}", config.provider);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

// Re-export commonly used items
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader};
pub use schema::*;
pub use validation::{
    is_valid_mime_type, parse_cloud_storage_config, parse_file_upload_options, Validator,
};
