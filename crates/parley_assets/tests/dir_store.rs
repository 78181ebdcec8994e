//! DirAssetStore against a real temporary directory.

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use parley_assets::{AssetError, AssetStore, DirAssetStore};

#[tokio::test]
async fn test_get_existing_png() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = common::solid_image_bytes(8, 8, ImageFormat::Png);
    std::fs::write(dir.path().join("asset-1.png"), &bytes).unwrap();

    let store = DirAssetStore::new(dir.path());
    let asset = store.get("asset-1").await.unwrap().expect("asset present");

    assert_eq!(asset.id, "asset-1");
    assert_eq!(asset.label, "asset-1.png");
    assert_eq!(asset.data.mime_type, "image/png");
    assert_eq!(STANDARD.decode(&asset.data.base64).unwrap(), bytes);
}

#[tokio::test]
async fn test_get_missing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirAssetStore::new(dir.path());
    assert!(store.get("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_extension_leaves_mime_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("blob.bin"), b"raw").unwrap();

    let store = DirAssetStore::new(dir.path());
    let asset = store.get("blob").await.unwrap().unwrap();
    assert_eq!(asset.data.mime_type, "");
    assert_eq!(asset.data.base64, STANDARD.encode(b"raw"));
}

#[tokio::test]
async fn test_directories_are_not_assets() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("folder")).unwrap();

    let store = DirAssetStore::new(dir.path());
    assert!(store.get("folder").await.unwrap().is_none());
}

#[tokio::test]
async fn test_path_traversal_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirAssetStore::new(dir.path());

    let err = store.get("../secret").await.unwrap_err();
    assert!(matches!(err, AssetError::InvalidAssetId(_)));
}

#[tokio::test]
async fn test_missing_root_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirAssetStore::new(dir.path().join("does-not-exist"));

    let err = store.get("a").await.unwrap_err();
    assert!(matches!(err, AssetError::Io(_)));
}

#[tokio::test]
async fn test_shared_stem_is_ambiguous() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cat.png"),
        common::solid_image_bytes(4, 4, ImageFormat::Png),
    )
    .unwrap();
    std::fs::write(dir.path().join("cat.jpg"), b"not really a jpeg").unwrap();

    let store = DirAssetStore::new(dir.path());
    let err = store.get("cat").await.unwrap_err();

    match err {
        AssetError::AmbiguousAssetId {
            asset_id,
            candidates,
        } => {
            assert_eq!(asset_id, "cat");
            assert_eq!(candidates, vec!["cat.jpg", "cat.png"]);
        }
        other => panic!("expected AmbiguousAssetId, got {other:?}"),
    }
}

#[tokio::test]
async fn test_load_file_reads_exact_path() {
    let dir = tempfile::tempdir().unwrap();
    let png = common::solid_image_bytes(4, 4, ImageFormat::Png);
    std::fs::write(dir.path().join("cat.png"), &png).unwrap();
    std::fs::write(dir.path().join("cat.jpg"), b"not really a jpeg").unwrap();

    let asset = DirAssetStore::load_file("cat", &dir.path().join("cat.png"))
        .await
        .unwrap();

    assert_eq!(asset.label, "cat.png");
    assert_eq!(asset.data.mime_type, "image/png");
    assert_eq!(STANDARD.decode(&asset.data.base64).unwrap(), png);
}
