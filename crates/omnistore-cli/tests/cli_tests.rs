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
//! End-to-end tests of the `omnistore` binary
//!
//! Every case fails or finishes before a network request: validation, the
//! allow-list and key checks all run locally.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create omnistore command with a clean environment
#[allow(deprecated)]
fn omnistore() -> Command {
    let mut cmd = Command::cargo_bin("omnistore").unwrap();
    for var in [
        "OMNISTORE_CONFIG",
        "OMNISTORE_PROVIDER",
        "OMNISTORE_BUCKET",
        "OMNISTORE_REGION",
        "OMNISTORE_ENDPOINT",
        "OMNISTORE_ACCESS_KEY_ID",
        "OMNISTORE_SECRET_ACCESS_KEY",
        "OMNISTORE_ALLOWED_FILE_TYPES",
        "OMNISTORE_GCS_CREDENTIALS",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--quiet");
    cmd
}

#[allow(deprecated)]
fn omnistore_with_logging() -> Command {
    let mut cmd = Command::cargo_bin("omnistore").unwrap();
    cmd.env_remove("OMNISTORE_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn s3_images_only(dir: &TempDir) -> PathBuf {
    write_config(
        dir,
        "storage.toml",
        r#"
provider = "s3"
allowedFileTypes = ["image/png"]

[config]
region = "us-east-1"
bucketName = "media"
accessKeyId = "AKIA"
secretAccessKey = "secret"
"#,
    )
}

#[test]
fn test_bad_log_filter_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut cmd = omnistore_with_logging();
    cmd.env("OMNISTORE_LOG", "omnistore=notalevel")
        .args(["--config"])
        .arg(dir.path().join("missing.toml"))
        .args(["mkdir", "albums"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log filter"))
        .stderr(predicate::str::contains("logging disabled"));
}

#[test]
fn test_help() {
    omnistore()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("mkdir"));
}

#[test]
fn test_completions() {
    omnistore()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("omnistore"));
}

#[test]
fn test_missing_config_file() {
    omnistore()
        .args(["--config", "/nonexistent/storage.toml", "mkdir", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_missing_environment_config() {
    omnistore()
        .args(["mkdir", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[VALIDATION_ERROR]"));
}

#[test]
fn test_unknown_provider() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "storage.json",
        r#"{ "provider": "azure", "config": { "bucketName": "x" } }"#,
    );

    omnistore()
        .arg("--config")
        .arg(&config)
        .args(["mkdir", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[UNSUPPORTED_PROVIDER]"));
}

#[test]
fn test_cloudinary_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "storage.yaml",
        "provider: cloudinary\nconfig:\n  cloudName: demo\n",
    );

    omnistore()
        .arg("--config")
        .arg(&config)
        .args(["mkdir", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[UNSUPPORTED_PROVIDER]"));
}

#[test]
fn test_upload_rejected_file_type() {
    let dir = TempDir::new().unwrap();
    let config = s3_images_only(&dir);
    let file = dir.path().join("notes.txt");
    fs::write(&file, "hello").unwrap();

    omnistore()
        .arg("--config")
        .arg(&config)
        .arg("upload")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("[UNSUPPORTED_FILE_TYPE]"))
        .stderr(predicate::str::contains("text/plain"));
}

#[test]
fn test_put_rejected_content_type() {
    let dir = TempDir::new().unwrap();
    let config = s3_images_only(&dir);

    omnistore()
        .arg("--config")
        .arg(&config)
        .args(["put", "clip.gif", "--content-type", "image/gif"])
        .write_stdin("GIF89a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("[UNSUPPORTED_FILE_TYPE]"));
}

#[test]
fn test_dest_with_many_files() {
    let dir = TempDir::new().unwrap();
    let config = s3_images_only(&dir);

    omnistore()
        .arg("--config")
        .arg(&config)
        .args(["upload", "a.png", "b.png", "--dest", "x.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dest can only be used with a single file"));
}

#[test]
fn test_mkdir_empty_name() {
    let dir = TempDir::new().unwrap();
    let config = s3_images_only(&dir);

    omnistore()
        .arg("--config")
        .arg(&config)
        .args(["mkdir", "/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[INVALID_KEY]"));
}

#[test]
fn test_bad_metadata_flag() {
    omnistore()
        .args(["upload", "a.png", "--meta", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}
