//! Layout repository integration tests over the file and memory backends

use floorkit_designer::persistence::sample_layouts;
use floorkit_designer::{
    Element, ElementKind, JsonFileBackend, Layout, LayoutBackend, LayoutRepository, MemoryBackend,
};
use floorkit_settings::StorageSettings;
use tempfile::TempDir;

fn shelf(id: &str) -> Element {
    Element::with_id(id, ElementKind::Shelf, id, 20.0, 20.0, 120.0, 40.0)
}

#[tokio::test]
async fn test_file_round_trip_uses_camel_case_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("layouts.json");
    let mut repo = LayoutRepository::new(JsonFileBackend::new(&path)).with_sample_data(false);

    let mut layout = Layout::new_for_store("S1", "Ground floor", 1200.0, 800.0);
    layout.elements.push(shelf("E1").with_rotation(30.0));
    let saved = repo.save_layout(&layout).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["objectId"], "S1");
    assert_eq!(json[0]["boundaryWidth"], 1200.0);
    assert_eq!(json[0]["elements"][0]["type"], "shelf");
    assert_eq!(json[0]["elements"][0]["rotation"], 30.0);
    assert!(!path.with_file_name("layouts.json.tmp").exists());

    let mut fresh = LayoutRepository::new(JsonFileBackend::new(&path)).with_sample_data(false);
    let loaded = fresh.get_layout_by_object_id("S1").await.unwrap().unwrap();
    assert_eq!(loaded.id, saved.id);
    assert_eq!(loaded.elements.len(), 1);
    assert_eq!(loaded.elements[0].rotation_degrees, 30.0);
    assert_eq!(loaded.elements[0].kind, ElementKind::Shelf);
}

#[tokio::test]
async fn test_missing_file_bootstraps_sample_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layouts.json");

    let mut repo = LayoutRepository::new(JsonFileBackend::new(&path));
    let layouts = repo.load_layouts().await.unwrap();
    assert_eq!(layouts.len(), sample_layouts().len());
    assert!(repo
        .get_layout_by_object_id("store-001")
        .await
        .unwrap()
        .is_some());
    // Sample data is only a fallback; nothing is written until a save.
    assert!(!path.exists());

    let mut empty = LayoutRepository::new(JsonFileBackend::new(&path)).with_sample_data(false);
    assert!(empty.load_layouts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layouts.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut repo = LayoutRepository::new(JsonFileBackend::new(&path));
    assert!(repo.load_layouts().await.unwrap().is_empty());

    // A save replaces the corrupt document with a valid one.
    repo.save_layout(&Layout::new_for_store("S1", "Main", 1200.0, 800.0))
        .await
        .unwrap();
    repo.invalidate();
    assert_eq!(repo.load_layouts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_upserts_by_id() {
    let mut repo = LayoutRepository::new(MemoryBackend::new()).with_sample_data(false);

    let first = repo
        .save_layout(&Layout::new_for_store("S1", "Main", 1200.0, 800.0))
        .await
        .unwrap();
    assert!(!first.id.is_empty());

    let mut renamed = first.clone();
    renamed.name = "Renamed".to_string();
    renamed.elements.push(shelf("E1"));
    let second = repo.save_layout(&renamed).await.unwrap();
    assert_eq!(second.id, first.id);
    assert!(second.updated_at >= first.updated_at);

    let all = repo.load_layouts().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Renamed");
    assert_eq!(all[0].elements.len(), 1);
}

#[tokio::test]
async fn test_delete_layout() {
    let mut repo = LayoutRepository::new(MemoryBackend::new()).with_sample_data(false);
    let a = repo.create_layout_for_store("S1", "A").await.unwrap();
    let b = repo.create_layout_for_store("S2", "B").await.unwrap();
    assert_eq!((a.boundary_width, a.boundary_height), (1200.0, 800.0));

    assert!(repo.delete_layout(&a.id).await.unwrap());
    assert!(!repo.delete_layout(&a.id).await.unwrap());

    let remaining = repo.load_layouts().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);

    let stored = repo.backend().contents().unwrap();
    assert!(!stored.contains(&a.id));
    assert!(stored.contains(&b.id));
}

#[tokio::test]
async fn test_failed_write_leaves_cache_and_backend_untouched() {
    let mut repo = LayoutRepository::new(MemoryBackend::new()).with_sample_data(false);
    let saved = repo.create_layout_for_store("S1", "Main").await.unwrap();
    let before = repo.backend().contents();

    repo.backend().set_fail_writes(true);
    let mut edited = saved.clone();
    edited.elements.push(shelf("E1"));
    let err = repo.save_layout(&edited).await.unwrap_err();
    assert!(err.is_storage_error());

    assert_eq!(repo.backend().contents(), before);
    let cached = repo.get_layout_by_id(&saved.id).await.unwrap().unwrap();
    assert!(cached.elements.is_empty());
    assert!(!repo.delete_layout("missing").await.unwrap());
}

#[tokio::test]
async fn test_cache_reads_backend_once() {
    let backend = MemoryBackend::new();
    backend.write("[]").await.unwrap();
    let mut repo = LayoutRepository::new(backend);
    assert!(repo.load_layouts().await.unwrap().is_empty());

    // Out-of-band change is invisible until the cache is dropped.
    let outside = r#"[{"id":"L9","name":"Outside","objectId":"S9"}]"#;
    repo.backend().write(outside).await.unwrap();
    assert!(repo.get_layout_by_id("L9").await.unwrap().is_none());

    repo.invalidate();
    let layout = repo.get_layout_by_id("L9").await.unwrap().unwrap();
    assert_eq!(layout.object_id, "S9");
    assert_eq!((layout.boundary_width, layout.boundary_height), (1200.0, 800.0));
}

#[tokio::test]
async fn test_from_settings_points_at_configured_file() {
    let dir = TempDir::new().unwrap();
    let storage = StorageSettings {
        layouts_file: dir.path().join("store.json"),
        bootstrap_sample_data: false,
    };
    let mut repo = LayoutRepository::from_settings(&storage);
    assert_eq!(repo.backend().path(), storage.layouts_file.as_path());

    repo.create_layout_for_store("S1", "Main").await.unwrap();
    assert!(storage.layouts_file.exists());
}
