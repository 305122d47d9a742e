use cradle_core::db::open_db_in_memory;
use cradle_core::{
    ChangeBus, DocumentCategory, DocumentRepository, DocumentService, DocumentServiceError,
    SqliteDocumentRepository,
};
use std::fs;
use std::path::Path;

#[test]
fn import_copies_file_and_inserts_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let storage_dir = workdir.path().join("documents");
    let service = DocumentService::new(repo, &storage_dir);

    let source = workdir.path().join("scan_week20.pdf");
    fs::write(&source, b"fake pdf bytes").unwrap();

    let document = service
        .import_file(&source, "Anatomy scan", DocumentCategory::Ultrasound)
        .unwrap();

    assert!(document.id > 0);
    assert!(Path::new(&document.file_path).starts_with(&storage_dir));
    assert_eq!(fs::read(&document.file_path).unwrap(), b"fake pdf bytes");

    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Anatomy scan");
    assert_eq!(listed[0].category, DocumentCategory::Ultrasound);
}

#[test]
fn import_of_missing_source_is_a_typed_io_error_and_inserts_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let service = DocumentService::new(repo, workdir.path().join("documents"));

    let missing = workdir.path().join("does_not_exist.jpg");
    let err = service
        .import_file(&missing, "Missing", DocumentCategory::Other)
        .unwrap_err();
    assert!(matches!(err, DocumentServiceError::Io { .. }));

    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn remove_deletes_row_and_stored_copy() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let service = DocumentService::new(repo, workdir.path().join("documents"));

    let source = workdir.path().join("insurance.pdf");
    fs::write(&source, b"policy").unwrap();
    let document = service
        .import_file(&source, "Insurance policy", DocumentCategory::Insurance)
        .unwrap();

    service.remove(&document).unwrap();

    assert!(!Path::new(&document.file_path).exists());
    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();
    assert!(repo.get(document.id).unwrap().is_none());
}

#[test]
fn category_listing_and_bulk_delete_are_scoped() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let scan = cradle_core::Document::new("Week 12 scan", DocumentCategory::Ultrasound, "/tmp/a");
    let lab = cradle_core::Document::new("Glucose test", DocumentCategory::LabResult, "/tmp/b");
    repo.insert(&scan).unwrap();
    repo.insert(&lab).unwrap();

    let ultrasounds = repo.list_by_category(DocumentCategory::Ultrasound).unwrap();
    assert_eq!(ultrasounds.len(), 1);
    assert_eq!(ultrasounds[0].title, "Week 12 scan");

    repo.delete_by_category(DocumentCategory::Ultrasound).unwrap();
    assert!(repo.list_by_category(DocumentCategory::Ultrasound).unwrap().is_empty());
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn search_matches_titles_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn, ChangeBus::new()).unwrap();

    repo.insert(&cradle_core::Document::new(
        "Blood panel results",
        DocumentCategory::LabResult,
        "/tmp/blood.pdf",
    ))
    .unwrap();
    repo.insert(&cradle_core::Document::new(
        "Birth plan draft",
        DocumentCategory::Other,
        "/tmp/plan.pdf",
    ))
    .unwrap();

    let hits = repo.search("BLOOD").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Blood panel results");

    assert_eq!(repo.search(" ").unwrap().len(), 2);
}
