//! Behavior every document backend must share, checked through PortalStore

use folio_core::defaults::default_portal;
use folio_core::error::FolioError;
use folio_core::models::Section;
use folio_core::Fields;
use folio_store::file::FileBackend;
use folio_store::memory::MemoryBackend;
use folio_store::{DocumentBackend, PortalStore};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

/// Stores over every local backend; the TempDir must outlive the file store
fn stores() -> (TempDir, Vec<PortalStore>) {
    let dir = TempDir::new().unwrap();
    let backends: Vec<Arc<dyn DocumentBackend>> = vec![
        Arc::new(MemoryBackend::new()),
        Arc::new(FileBackend::new(dir.path())),
    ];
    (dir, backends.into_iter().map(PortalStore::new).collect())
}

#[tokio::test]
async fn test_create_assigns_fresh_nonempty_id() {
    let (_dir, stores) = stores();
    for store in stores {
        let before = store.load_data().await.unwrap();
        let ids: Vec<String> = before.projects.iter().map(|p| p.id.clone()).collect();

        let created = store
            .create(Section::Projects, fields(json!({"id": "proj-1", "title": "New"})))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();

        assert!(!id.is_empty(), "{}", store.backend_name());
        assert!(!ids.contains(&id.to_string()), "{}", store.backend_name());
        assert_eq!(store.list(Section::Projects).await.unwrap().len(), ids.len() + 1);
    }
}

#[tokio::test]
async fn test_update_absent_id_leaves_section_unchanged() {
    let (_dir, stores) = stores();
    for store in stores {
        let before = store.list(Section::Research).await.unwrap();
        let result = store
            .update(Section::Research, "no-such-id", fields(json!({"title": "X"})))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.list(Section::Research).await.unwrap(), before);
    }
}

#[tokio::test]
async fn test_delete_twice_removes_once() {
    let (_dir, stores) = stores();
    for store in stores {
        let before = store.list(Section::Courses).await.unwrap().len();

        assert!(store.delete(Section::Courses, "course-1").await.unwrap());
        assert!(!store.delete(Section::Courses, "course-1").await.unwrap());
        assert_eq!(store.list(Section::Courses).await.unwrap().len(), before - 1);
    }
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let (_dir, stores) = stores();
    for store in stores {
        store
            .create(Section::Certifications, fields(json!({"name": "Cert"})))
            .await
            .unwrap();
        let before = store.load_data().await.unwrap();

        let exported = store.export_data().await.unwrap();
        store.reset_data().await.unwrap();
        store.import_data(&exported).await.unwrap();
        store.invalidate().await;

        assert_eq!(store.load_data().await.unwrap(), before);
    }
}

#[tokio::test]
async fn test_malformed_import_stores_nothing() {
    let (_dir, stores) = stores();
    for store in stores {
        let before = store.load_data().await.unwrap();

        for text in ["not json", "{}", "[1, 2]"] {
            let err = store.import_data(text).await.unwrap_err();
            assert!(matches!(err, FolioError::Import { .. }), "{}", text);
        }

        store.invalidate().await;
        assert_eq!(store.load_data().await.unwrap(), before);
    }
}

#[tokio::test]
async fn test_reset_restores_default() {
    let (_dir, stores) = stores();
    for store in stores {
        store.delete(Section::Blogs, "blog-1").await.unwrap();
        store.update_about(fields(json!({"name": "Someone"}))).await.unwrap();

        store.reset_data().await.unwrap();
        store.invalidate().await;

        assert_eq!(store.load_data().await.unwrap(), default_portal());
    }
}

#[tokio::test]
async fn test_education_create_then_update() {
    let (_dir, stores) = stores();
    for store in stores {
        let mut data = store.load_data().await.unwrap();
        data.education.clear();
        store
            .import_data(&serde_json::to_string(&data).unwrap())
            .await
            .unwrap();

        let created = store
            .create(
                Section::Education,
                fields(json!({
                    "degree": "PhD",
                    "institution": "X",
                    "year": "2020",
                    "description": "Thesis"
                })),
            )
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();
        store
            .update(Section::Education, id, fields(json!({"year": "2021"})))
            .await
            .unwrap()
            .unwrap();

        let education = store.load_data().await.unwrap().education;
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].year, "2021");
        assert_eq!(education[0].degree, "PhD");
        assert_eq!(education[0].institution, "X");
        assert_eq!(education[0].description, "Thesis");
    }
}

#[tokio::test]
async fn test_unknown_section_shapes_are_rejected() {
    let (_dir, stores) = stores();
    for store in stores {
        let err = store.create(Section::About, Fields::new()).await.unwrap_err();
        assert!(matches!(err, FolioError::NotAList { .. }));
    }
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let created = {
        let store = PortalStore::new(Arc::new(FileBackend::new(dir.path())));
        store
            .create(Section::Gallery, fields(json!({"title": "Lab", "image": "lab.jpg"})))
            .await
            .unwrap()
    };

    let reopened = PortalStore::new(Arc::new(FileBackend::new(dir.path())));
    let gallery = reopened.list(Section::Gallery).await.unwrap();
    assert!(gallery.contains(&created));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_update_overwrites_patch_keys_only(
        title in "[a-zA-Z ]{1,20}",
        semester in "(Fall|Spring|Summer) 20[0-9]{2}",
        room in "[A-Z]{2}-[0-9]{3}",
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let store = PortalStore::new(Arc::new(MemoryBackend::new()));
            let before = store.list(Section::Courses).await.unwrap()[0].clone();
            let id = before["id"].as_str().unwrap().to_string();

            let updated = store
                .update(
                    Section::Courses,
                    &id,
                    fields(json!({"title": title, "semester": semester, "room": room})),
                )
                .await
                .unwrap()
                .unwrap();

            let mut expected = before.as_object().cloned().unwrap();
            expected.insert("title".to_string(), json!(title));
            expected.insert("semester".to_string(), json!(semester));
            expected.insert("room".to_string(), json!(room));
            assert_eq!(updated, Value::Object(expected));
        });
    }
}
