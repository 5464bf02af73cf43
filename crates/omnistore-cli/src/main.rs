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
//! `omnistore`: upload, delete and organize objects in GCS, S3 or
//! DigitalOcean Spaces through one configuration file.

mod commands;
mod output;
mod settings;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use commands::*;
use omnistore_config::ConfigError;
use omnistore_observability::{init_tracing_with_config, LogConfig, LogError, LogFormat};
use omnistore_storage::{CloudStorage, StorageError};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "omnistore")]
#[command(version, about = "One API for GCS, S3 and DigitalOcean Spaces")]
#[command(
    long_about = "Omnistore uploads files and buffers, deletes objects and creates folders in the
bucket named by a storage configuration file, whichever cloud provider it points at."
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress status output and logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format (pretty|compact|json)
    #[arg(long, global = true, value_name = "FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// Colored output
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload local files
    Upload(UploadCmd),

    /// Upload bytes from stdin or a file
    Put(PutCmd),

    /// Delete objects
    Delete(DeleteCmd),

    /// Create a folder
    Mkdir(MkdirCmd),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Never => console::set_colors_enabled_stderr(false),
        ColorChoice::Always => console::set_colors_enabled_stderr(true),
        ColorChoice::Auto => {}
    }

    // Initialize structured logging
    if !cli.quiet {
        let mut config = LogConfig::new()
            .with_format(cli.log_format)
            .with_color(console::colors_enabled_stderr());
        if cli.verbose {
            config = config.with_level("debug");
        }
        if let Some(msg) = log_setup_failure(init_tracing_with_config(&config)) {
            output::warning(&msg);
        }
    }

    if let Err(e) = run(cli).await {
        output::error(&format_error(&e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "omnistore", &mut io::stdout());
        return Ok(());
    }

    let config = settings::load_config(cli.config.as_deref()).await?;
    let storage = CloudStorage::init(&config).await?;

    match cli.command {
        Commands::Upload(cmd) => cmd.execute(&storage).await,
        Commands::Put(cmd) => cmd.execute(&storage).await,
        Commands::Delete(cmd) => cmd.execute(&storage, cli.quiet).await,
        Commands::Mkdir(cmd) => cmd.execute(&storage, cli.quiet).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Message for a logging setup failure worth reporting
///
/// An already installed subscriber is kept silently.
fn log_setup_failure(result: Result<(), LogError>) -> Option<String> {
    match result {
        Ok(()) | Err(LogError::AlreadyInitialized(_)) => None,
        Err(e) => Some(format!("{}; logging disabled", e)),
    }
}

/// Render an error with its stable code when it has one
fn format_error(err: &anyhow::Error) -> String {
    // Storage errors already carry their cause in the message
    if let Some(storage_err) = err.downcast_ref::<StorageError>() {
        return format!("[{}] {}", storage_err.code(), storage_err);
    }

    match err.downcast_ref::<ConfigError>() {
        Some(config_err) if config_err.is_unsupported_provider() => {
            format!("[UNSUPPORTED_PROVIDER] {:#}", err)
        }
        Some(_) => format!("[VALIDATION_ERROR] {:#}", err),
        None => format!("Error: {:#}", err),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use omnistore_config::ProviderKind;
    use omnistore_storage::Operation;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_storage_error() {
        let err = anyhow::Error::from(StorageError::provider(
            ProviderKind::S3,
            Operation::Delete,
            anyhow::anyhow!("access denied"),
        ));
        assert_eq!(format_error(&err), "[S3_DELETE_ERROR] S3 delete failed: access denied");
    }

    #[test]
    fn test_format_config_error_through_context() {
        let err = anyhow::Error::from(ConfigError::MissingRequired("provider".into()))
            .context("Failed to load configuration");
        assert!(format_error(&err).starts_with("[VALIDATION_ERROR] Failed to load configuration"));
    }

    #[test]
    fn test_log_setup_failure() {
        assert_eq!(log_setup_failure(Ok(())), None);
        assert_eq!(
            log_setup_failure(Err(LogError::AlreadyInitialized("set".into()))),
            None
        );

        let msg = log_setup_failure(Err(LogError::InvalidFilter {
            filter: "omnistore=loud".into(),
            reason: "invalid level".into(),
        }))
        .unwrap();
        assert!(msg.starts_with("Invalid log filter 'omnistore=loud'"));
        assert!(msg.ends_with("logging disabled"));
    }

    #[test]
    fn test_format_plain_error() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(format_error(&err), "Error: boom");
    }
}
