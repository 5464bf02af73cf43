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
//! Behavioural tests of the storage facade over the in-memory client
//!
//! Each provider adapter is wired to a `MemoryObjectClient` so the full
//! upload/delete/folder flow runs without a network.

use omnistore_config::{DoSpacesConfig, ProviderKind, S3Config};
use omnistore_storage::mock::{MemoryFileSource, MemoryObjectClient};
use omnistore_storage::{
    AllowList, BufferFileInfo, CloudStorage, DoSpacesProvider, FileUploadOptions, GcsProvider,
    Provider, S3Provider, StorageProvider,
};
use serde_json::json;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const BUCKET: &str = "media-assets";

fn files() -> MemoryFileSource {
    MemoryFileSource::new()
        .with_file("/upload/photo.png", &b"\x89PNG"[..])
        .with_file("/upload/scan.jpg", &b"\xff\xd8"[..])
        .with_file("/upload/notes.txt", &b"hello"[..])
}

fn s3_config() -> S3Config {
    S3Config {
        region: "us-east-1".into(),
        bucket_name: BUCKET.into(),
        access_key_id: "AKIA".into(),
        secret_access_key: "secret".into(),
    }
}

fn spaces_config() -> DoSpacesConfig {
    DoSpacesConfig {
        region: "nyc3".into(),
        endpoint: "nyc3.digitaloceanspaces.com".into(),
        bucket_name: BUCKET.into(),
        access_key_id: "key".into(),
        secret_access_key: "secret".into(),
    }
}

/// One facade per provider, all backed by `client`
fn all_providers(client: &MemoryObjectClient, allowed: &AllowList) -> Vec<CloudStorage> {
    let gcs = GcsProvider::with_client(BUCKET, Arc::new(client.clone()), allowed.clone())
        .with_file_source(Arc::new(files()));
    let s3 = S3Provider::with_client(&s3_config(), Arc::new(client.clone()), allowed.clone())
        .with_file_source(Arc::new(files()));
    let spaces =
        DoSpacesProvider::with_client(&spaces_config(), Arc::new(client.clone()), allowed.clone())
            .with_file_source(Arc::new(files()));

    vec![
        CloudStorage::from_provider(gcs),
        CloudStorage::from_provider(s3),
        CloudStorage::from_provider(spaces),
    ]
}

fn vendor_prefix(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gcs => "GCS",
        ProviderKind::S3 => "S3",
        ProviderKind::DoSpaces => "DO_SPACES",
        ProviderKind::Cloudinary => "CLOUDINARY",
    }
}

#[tokio::test]
async fn test_upload_reports_provider_and_url() {
    let client = MemoryObjectClient::new();
    let expected = [
        (ProviderKind::Gcs, "https://storage.googleapis.com/media-assets/photo.png"),
        (ProviderKind::S3, "https://media-assets.s3.us-east-1.amazonaws.com/photo.png"),
        (ProviderKind::DoSpaces, "https://media-assets.nyc3.digitaloceanspaces.com/photo.png"),
    ];

    for (storage, (kind, url)) in all_providers(&client, &AllowList::unrestricted())
        .iter()
        .zip(expected)
    {
        let info = storage
            .upload("/upload/photo.png", &FileUploadOptions::default())
            .await
            .unwrap();
        assert_eq!(info.id, "photo.png");
        assert_eq!(info.provider, kind);
        assert_eq!(info.url, url);
        assert_eq!(storage.bucket(), BUCKET);
    }
}

#[tokio::test]
async fn test_rejected_type_issues_no_client_call() {
    let client = MemoryObjectClient::new();
    let allowed = AllowList::new(Some(vec!["image/png".to_string()]));

    for storage in all_providers(&client, &allowed) {
        let err = storage
            .upload("/upload/notes.txt", &FileUploadOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_unsupported_file_type());

        let file = BufferFileInfo::new(&b"GIF89a"[..], "anim.gif", "image/gif");
        let err = storage
            .upload_buffer(&file, &FileUploadOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_FILE_TYPE");
    }

    assert_eq!(client.put_calls(), 0);
}

#[tokio::test]
async fn test_buffer_random_names_are_unique() {
    let client = MemoryObjectClient::new();
    let storage = all_providers(&client, &AllowList::unrestricted()).remove(1);
    let files: Vec<BufferFileInfo> = (0..50)
        .map(|i| BufferFileInfo::new(vec![i as u8], "frame.webp", "image/webp"))
        .collect();

    let infos = storage
        .upload_bulk_buffer(&files, &FileUploadOptions::default())
        .await
        .unwrap();

    let ids: HashSet<&str> = infos.iter().map(|info| info.id.as_str()).collect();
    assert_eq!(ids.len(), 50);
    for info in &infos {
        assert!(info.id.ends_with(".webp"));
        assert_eq!(info.id.len(), 32 + ".webp".len());
    }
    assert_eq!(client.len().await, 50);
}

#[tokio::test]
async fn test_upload_to_folder_trailing_slash() {
    let client = MemoryObjectClient::new();

    for storage in all_providers(&client, &AllowList::unrestricted()) {
        let a = storage
            .upload_to_folder("reports", "/upload/notes.txt", &FileUploadOptions::default())
            .await
            .unwrap();
        let b = storage
            .upload_to_folder("reports/", "/upload/notes.txt", &FileUploadOptions::default())
            .await
            .unwrap();
        assert_eq!(a.id, "reports/notes.txt");
        assert_eq!(a.id, b.id);
    }
}

#[tokio::test]
async fn test_bulk_failure_rejects_whole_call() {
    let client = MemoryObjectClient::new();
    client.fail_on("scan.jpg").await;

    for storage in all_providers(&client, &AllowList::unrestricted()) {
        let paths = vec![
            PathBuf::from("/upload/photo.png"),
            PathBuf::from("/upload/scan.jpg"),
        ];
        let err = storage
            .upload_bulk(&paths, &FileUploadOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.code(),
            format!("{}_UPLOAD_ERROR", vendor_prefix(storage.provider_kind()))
        );
    }
}

#[tokio::test]
async fn test_bulk_rejection_lets_issued_siblings_finish() {
    let allowed = AllowList::new(Some(vec!["text/plain".to_string()]));
    let batch = vec![
        BufferFileInfo::new(&b"a"[..], "a.txt", "text/plain"),
        BufferFileInfo::new(&b"b"[..], "b.png", "image/png"),
        BufferFileInfo::new(&b"c"[..], "c.txt", "text/plain"),
    ];

    for index in 0..3 {
        let client = MemoryObjectClient::new().with_put_delay(Duration::from_millis(50));
        let storage = all_providers(&client, &allowed).remove(index);

        let err = storage
            .upload_bulk_buffer(&batch, &FileUploadOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_unsupported_file_type());

        // Both slow uploads landed although the png was rejected first
        let keys = client.keys(BUCKET).await;
        assert_eq!(keys.len(), 2, "{}: {:?}", storage.provider_kind(), keys);
        assert!(keys.iter().all(|key| key.ends_with(".txt")));
    }
}

#[tokio::test]
async fn test_bulk_vendor_failure_lets_siblings_finish() {
    let client = MemoryObjectClient::new().with_put_delay(Duration::from_millis(50));
    client.fail_on("scan.jpg").await;
    let storage = all_providers(&client, &AllowList::unrestricted()).remove(1);
    let paths = vec![
        PathBuf::from("/upload/photo.png"),
        PathBuf::from("/upload/scan.jpg"),
        PathBuf::from("/upload/notes.txt"),
    ];

    let err = storage
        .upload_bulk(&paths, &FileUploadOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "S3_UPLOAD_ERROR");
    assert_eq!(client.keys(BUCKET).await, vec!["notes.txt", "photo.png"]);
    assert_eq!(client.put_calls(), 3);
}

#[tokio::test]
async fn test_s3_style_clients_report_no_metadata() {
    let client = MemoryObjectClient::new().with_object_metadata(false);

    for storage in all_providers(&client, &AllowList::unrestricted()) {
        let info = storage
            .upload("/upload/scan.jpg", &FileUploadOptions::default())
            .await
            .unwrap();
        assert_eq!(info.id, "scan.jpg");
        assert!(info.metadata.is_none());
    }
}

#[tokio::test]
async fn test_bulk_missing_file_rejects() {
    let client = MemoryObjectClient::new();
    let storage = all_providers(&client, &AllowList::unrestricted()).remove(0);
    let paths = vec![
        PathBuf::from("/upload/photo.png"),
        PathBuf::from("/upload/missing.png"),
    ];

    let err = storage
        .upload_bulk(&paths, &FileUploadOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "GCS_UPLOAD_ERROR");
}

#[tokio::test]
async fn test_create_folder_idempotent() {
    let client = MemoryObjectClient::new();
    let providers = all_providers(&client, &AllowList::unrestricted());

    for storage in &providers {
        storage.create_folder("albums").await.unwrap();
        storage.create_folder("albums").await.unwrap();
        storage.create_folder("albums/").await.unwrap();
    }

    // GCS writes a placeholder; S3 and Spaces share the trailing-slash marker
    assert_eq!(
        client.keys(BUCKET).await,
        vec!["albums/".to_string(), "albums/.placeholder".to_string()]
    );
}

#[tokio::test]
async fn test_delete_round_trip() {
    let client = MemoryObjectClient::new();

    for storage in all_providers(&client, &AllowList::unrestricted()) {
        let file = BufferFileInfo::new(&b"payload"[..], "a.bin", "application/octet-stream");
        let info = storage
            .upload_buffer(&file, &FileUploadOptions::default())
            .await
            .unwrap();
        assert!(client.contains(BUCKET, &info.id).await);

        storage.delete(&info.id).await.unwrap();
        assert!(!client.contains(BUCKET, &info.id).await);
    }
}

#[tokio::test]
async fn test_delete_bulk() {
    let client = MemoryObjectClient::new();
    let storage = all_providers(&client, &AllowList::unrestricted()).remove(2);

    let paths = vec![
        PathBuf::from("/upload/photo.png"),
        PathBuf::from("/upload/scan.jpg"),
    ];
    let infos = storage
        .upload_bulk(&paths, &FileUploadOptions::default())
        .await
        .unwrap();
    let ids: Vec<String> = infos.into_iter().map(|info| info.id).collect();

    storage.delete_bulk(&ids).await.unwrap();
    assert!(client.is_empty().await);
}

#[tokio::test]
async fn test_delete_failure_code_per_vendor() {
    let client = MemoryObjectClient::new();
    client.fail_on("locked.bin").await;

    for storage in all_providers(&client, &AllowList::unrestricted()) {
        let err = storage.delete("locked.bin").await.unwrap_err();
        assert_eq!(
            err.code(),
            format!("{}_DELETE_ERROR", vendor_prefix(storage.provider_kind()))
        );
    }
}

#[tokio::test]
async fn test_metadata_attached() {
    let client = MemoryObjectClient::new();
    let storage = all_providers(&client, &AllowList::unrestricted()).remove(0);
    let options = FileUploadOptions::new()
        .with_destination("profile/avatar.png")
        .with_metadata("userId", json!(42))
        .with_metadata("source", json!("web"));

    storage.upload("/upload/photo.png", &options).await.unwrap();

    let object = client.get(BUCKET, "profile/avatar.png").await.unwrap();
    assert_eq!(object.metadata["userId"], "42");
    assert_eq!(object.metadata["source"], "web");
    assert_eq!(object.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_upload_buffer_to_folder_with_destination() {
    let client = MemoryObjectClient::new();
    let storage = all_providers(&client, &AllowList::unrestricted()).remove(1);
    let file = BufferFileInfo::new(&b"%PDF"[..], "invoice.pdf", "application/pdf");
    let options = FileUploadOptions::new().with_destination("2024-01.pdf");

    let info = storage
        .upload_buffer_to_folder("invoices/", &file, &options)
        .await
        .unwrap();
    assert_eq!(info.id, "invoices/2024-01.pdf");
    assert_eq!(
        info.url,
        "https://media-assets.s3.us-east-1.amazonaws.com/invoices/2024-01.pdf"
    );
}

#[tokio::test]
async fn test_empty_folder_name_rejected() {
    let client = MemoryObjectClient::new();
    let storage = all_providers(&client, &AllowList::unrestricted()).remove(0);

    let err = storage.create_folder("/").await.unwrap_err();
    assert_eq!(err.code(), "INVALID_KEY");
    assert_eq!(client.put_calls(), 0);
}

#[tokio::test]
async fn test_provider_enum_dispatch() {
    let client = MemoryObjectClient::new();
    let provider: Provider =
        S3Provider::with_client(&s3_config(), Arc::new(client.clone()), AllowList::unrestricted())
            .with_file_source(Arc::new(files()))
            .into();

    assert_eq!(provider.kind(), ProviderKind::S3);
    let info = provider
        .upload(Path::new("/upload/scan.jpg"), &FileUploadOptions::default())
        .await
        .unwrap();
    assert_eq!(info.id, "scan.jpg");
}

#[tokio::test]
async fn test_init_targets_configured_bucket() {
    let storage = CloudStorage::init_from_value(json!({
        "provider": "do-spaces",
        "config": {
            "region": "fra1",
            "endpoint": "https://fra1.digitaloceanspaces.com",
            "bucketName": "team-files",
            "accessKeyId": "key",
            "secretAccessKey": "secret"
        },
        "allowedFileTypes": ["application/pdf"]
    }))
    .await
    .unwrap();

    assert_eq!(storage.provider_kind(), ProviderKind::DoSpaces);
    assert_eq!(storage.bucket(), "team-files");

    // Rejected locally; no request reaches the endpoint
    let file = BufferFileInfo::new(&b"x"[..], "x.png", "image/png");
    let err = storage
        .upload_buffer(&file, &FileUploadOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_unsupported_file_type());
}

#[tokio::test]
async fn test_init_rejects_unknown_and_reserved_providers() {
    for tag in ["azure", "cloudinary", ""] {
        let err = CloudStorage::init_from_value(json!({ "provider": tag, "config": {} }))
            .await
            .unwrap_err();
        assert!(err.is_unsupported_provider(), "tag {:?}: {}", tag, err);
    }
}
