//! [`FileCatalog`] — the file/URL implementation of [`Catalog`].

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  sync::{Arc, PoisonError, RwLock},
  time::Duration,
};

use stockroom_core::{catalog::Catalog, table::Table};

use crate::{Error, Result, source::Source};

/// Parsed tables plus a counter bumped by every invalidation. A load only
/// caches its result if no invalidation happened while it was fetching.
#[derive(Default)]
struct Cache {
  tables:     HashMap<String, Arc<Table>>,
  generation: u64,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// A catalog read from one spreadsheet file or URL.
///
/// Parsed tables are cached per source key until [`FileCatalog::invalidate`]
/// or an upload clears them. Cloning is cheap; clones share the cache.
#[derive(Clone)]
pub struct FileCatalog {
  source: Source,
  http:   reqwest::Client,
  cache:  Arc<RwLock<Cache>>,
}

impl FileCatalog {
  pub fn new(source: Source) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      source,
      http,
      cache: Arc::default(),
    })
  }

  pub fn source(&self) -> &Source { &self.source }

  /// The cached table for `key`, or the generation a fresh load starts in.
  pub(crate) fn lookup(&self, key: &str) -> std::result::Result<Arc<Table>, u64> {
    let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
    cache.tables.get(key).cloned().ok_or(cache.generation)
  }

  /// Cache `table` unless the cache was invalidated after `generation`.
  pub(crate) fn store_if_current(&self, key: String, table: Arc<Table>, generation: u64) {
    let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
    if cache.generation != generation {
      tracing::debug!(key = %key, "cache invalidated during load; not caching");
      return;
    }
    cache.tables.insert(key, table);
  }

  /// Load `source`, reusing a cached table when one exists.
  pub async fn load(&self, source: &Source) -> Result<Arc<Table>> {
    let key = source.key();
    let generation = match self.lookup(&key) {
      Ok(table) => return Ok(table),
      Err(generation) => generation,
    };

    let bytes = self.fetch(source).await?;
    let name = source.to_string();
    let table = tokio::task::spawn_blocking(move || stockroom_sheet::decode(&bytes, &name))
      .await??;
    tracing::info!(source = %source, "{}", table.summary());

    let table = Arc::new(table);
    self.store_if_current(key, Arc::clone(&table), generation);
    Ok(table)
  }

  async fn fetch(&self, source: &Source) -> Result<Vec<u8>> {
    match source {
      Source::Path(path) => read_file(path).await,
      Source::Url(url) => {
        tracing::debug!(%url, "fetching catalog");
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
      }
    }
  }

  /// Drop every cached table. Loads already in flight will not cache what
  /// they read.
  pub fn invalidate(&self) {
    self.invalidate_at();
  }

  fn invalidate_at(&self) -> u64 {
    let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
    let dropped = cache.tables.len();
    cache.tables.clear();
    cache.generation += 1;
    tracing::info!(dropped, generation = cache.generation, "catalog cache cleared");
    cache.generation
  }

  /// Validate `bytes`, write them over the backing file, and make the new
  /// table current.
  pub async fn upload(&self, bytes: Vec<u8>) -> Result<Arc<Table>> {
    let Source::Path(path) = &self.source else {
      return Err(Error::ReadOnlySource(self.source.to_string()));
    };

    let name = self.source.to_string();
    let prepared =
      tokio::task::spawn_blocking(move || stockroom_sheet::prepare_upload(&bytes, &name))
        .await??;

    write_atomically(path, &prepared.bytes).await?;
    let generation = self.invalidate_at();

    let table = Arc::new(prepared.table);
    tracing::info!(
      path = %path.display(),
      format = ?prepared.format,
      "upload stored; {}",
      table.summary()
    );
    self.store_if_current(self.source.key(), Arc::clone(&table), generation);
    Ok(table)
  }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
  tokio::fs::read(path).await.map_err(|e| match e.kind() {
    std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
    _ => Error::Io(e),
  })
}

/// Write to a sibling temporary file, then rename it over `path`, so readers
/// never see a half-written spreadsheet.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
  let mut tmp: PathBuf = path.to_path_buf();
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  tmp.set_file_name(format!(".{file_name}.upload"));

  tokio::fs::write(&tmp, bytes).await?;
  tokio::fs::rename(&tmp, path).await?;
  Ok(())
}

// ─── Trait impl ──────────────────────────────────────────────────────────────

impl Catalog for FileCatalog {
  type Error = Error;

  async fn table(&self) -> Result<Arc<Table>> { self.load(&self.source).await }

  fn invalidate(&self) { FileCatalog::invalidate(self) }

  async fn replace(&self, bytes: Vec<u8>) -> Result<Arc<Table>> { self.upload(bytes).await }

  fn is_rejection(error: &Error) -> bool {
    matches!(error, Error::Sheet(_) | Error::ReadOnlySource(_))
  }
}
