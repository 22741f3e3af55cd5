//! Integration tests for `FileCatalog` against files in a temporary directory.

use std::{path::PathBuf, sync::Arc};

use stockroom_core::catalog::Catalog;

use crate::{Error, FileCatalog, Source};

const V1: &str = "Codigo,Nombre,Stock\nA1,Pelota,4\nA2,Yo-yo,0\n";
const V2: &str = "Codigo,Nombre,Stock\nA1,Pelota,4\nA2,Yo-yo,0\nA3,Trompo,9\n";

fn catalog_at(dir: &tempfile::TempDir, contents: Option<&str>) -> (FileCatalog, PathBuf) {
  let path = dir.path().join("productos.csv");
  if let Some(contents) = contents {
    std::fs::write(&path, contents).unwrap();
  }
  let catalog = FileCatalog::new(Source::Path(path.clone())).unwrap();
  (catalog, path)
}

// ─── Loading and caching ─────────────────────────────────────────────────────

#[tokio::test]
async fn loads_table_from_file() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, _) = catalog_at(&dir, Some(V1));

  let table = catalog.table().await.unwrap();
  assert_eq!(table.len(), 2);
  assert_eq!(table.summary(), "2 rows, 3 columns loaded");
}

#[tokio::test]
async fn missing_file_is_not_found() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, path) = catalog_at(&dir, None);

  let err = catalog.table().await.unwrap_err();
  assert!(matches!(&err, Error::NotFound(p) if *p == path), "got {err:?}");
}

#[tokio::test]
async fn repeated_loads_reuse_cached_table() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, path) = catalog_at(&dir, Some(V1));

  let first = catalog.table().await.unwrap();
  std::fs::write(&path, V2).unwrap();
  let second = catalog.table().await.unwrap();

  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(second.len(), 2, "file change is not seen until invalidation");
}

#[tokio::test]
async fn invalidate_forces_reread() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, path) = catalog_at(&dir, Some(V1));

  catalog.table().await.unwrap();
  std::fs::write(&path, V2).unwrap();
  Catalog::invalidate(&catalog);

  let table = catalog.table().await.unwrap();
  assert_eq!(table.len(), 3);
}

#[tokio::test]
async fn clones_share_the_cache() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, _) = catalog_at(&dir, Some(V1));
  let other = catalog.clone();

  let a = catalog.table().await.unwrap();
  let b = other.table().await.unwrap();
  assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn cache_is_keyed_by_source() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, _) = catalog_at(&dir, Some(V1));
  let other_path = dir.path().join("otros.csv");
  std::fs::write(&other_path, V2).unwrap();

  let default = catalog.table().await.unwrap();
  let other = catalog.load(&Source::Path(other_path)).await.unwrap();
  assert_eq!(default.len(), 2);
  assert_eq!(other.len(), 3);
}

#[tokio::test]
async fn bad_schema_fails_the_load() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, _) = catalog_at(&dir, Some("Foo,Bar\n1,2\n"));

  let err = catalog.table().await.unwrap_err();
  assert!(matches!(err, Error::Sheet(_)), "got {err:?}");
}

// ─── Upload ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_overwrites_file_and_clears_cache() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, path) = catalog_at(&dir, Some(V1));
  let before = catalog.table().await.unwrap();

  let uploaded = catalog.replace(V2.as_bytes().to_vec()).await.unwrap();
  assert_eq!(uploaded.len(), 3);

  let after = catalog.table().await.unwrap();
  assert!(!Arc::ptr_eq(&before, &after));
  assert_eq!(after.len(), 3);
  assert_eq!(std::fs::read_to_string(&path).unwrap(), V2);
}

#[tokio::test]
async fn load_racing_an_upload_does_not_cache_stale_table() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, _) = catalog_at(&dir, Some(V1));

  // A load that read the old file, then lost the race to an upload.
  let Err(generation) = catalog.lookup(&catalog.source().key()) else {
    panic!("cache should start empty");
  };
  let stale = Arc::new(stockroom_sheet::decode(V1.as_bytes(), "stale").unwrap());
  catalog.replace(V2.as_bytes().to_vec()).await.unwrap();
  catalog.store_if_current(catalog.source().key(), stale, generation);

  let table = catalog.table().await.unwrap();
  assert_eq!(table.len(), 3);
}

#[tokio::test]
async fn concurrent_loads_and_upload_settle_on_new_file() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, _) = catalog_at(&dir, Some(V1));

  let loads: Vec<_> = (0..8)
    .map(|_| {
      let c = catalog.clone();
      tokio::spawn(async move { c.table().await.map(|t| t.len()) })
    })
    .collect();
  catalog.replace(V2.as_bytes().to_vec()).await.unwrap();
  for load in loads {
    let len = load.await.unwrap().unwrap();
    assert!(len == 2 || len == 3);
  }

  assert_eq!(catalog.table().await.unwrap().len(), 3);
}

#[tokio::test]
async fn latin1_upload_is_stored_as_utf8() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, path) = catalog_at(&dir, Some(V1));

  catalog
    .replace(b"Codigo;Nombre\nA9;Mu\xF1eca\n".to_vec())
    .await
    .unwrap();

  let stored = std::fs::read_to_string(&path).unwrap();
  assert!(stored.contains("Muñeca"), "stored: {stored}");
  let table = catalog.table().await.unwrap();
  assert_eq!(table.require("A9").unwrap().name, "Muñeca");
}

#[tokio::test]
async fn rejected_upload_leaves_file_untouched() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, path) = catalog_at(&dir, Some(V1));

  assert!(catalog.replace(b"Foo\n1\n".to_vec()).await.is_err());
  assert_eq!(std::fs::read_to_string(&path).unwrap(), V1);
}

#[tokio::test]
async fn url_source_is_read_only() {
  let catalog = FileCatalog::new(Source::parse("https://example.invalid/p.csv")).unwrap();
  let err = catalog.replace(V1.as_bytes().to_vec()).await.unwrap_err();
  assert!(matches!(err, Error::ReadOnlySource(_)), "got {err:?}");
  assert!(FileCatalog::is_rejection(&err));
}

#[tokio::test]
async fn bad_upload_is_a_rejection_but_write_failure_is_not() {
  let dir = tempfile::tempdir().unwrap();
  let (catalog, _) = catalog_at(&dir, Some(V1));
  let err = catalog.replace(b"Foo\n1\n".to_vec()).await.unwrap_err();
  assert!(FileCatalog::is_rejection(&err), "got {err:?}");

  let unwritable = FileCatalog::new(Source::Path(dir.path().join("gone/productos.csv"))).unwrap();
  let err = unwritable.replace(V2.as_bytes().to_vec()).await.unwrap_err();
  assert!(matches!(err, Error::Io(_)), "got {err:?}");
  assert!(!FileCatalog::is_rejection(&err));
}
