//! JSON-file-backed filter store.
//!
//! One file per table id under a data directory, so snapshots survive
//! restarts. Table ids are sanitized into file names; distinct ids that
//! sanitize identically would share a file, so callers should stick to
//! alphanumeric ids with `-`/`_`.

use super::FilterStore;
use crate::model::{StoreError, TableId};
use crate::query::QueryMap;
use std::fs;
use std::path::{Path, PathBuf};

/// [`FilterStore`] writing one `<table>.json` per table id.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory
    /// (`<data_dir>/histview/filters`), or `None` when the platform
    /// reports no data directory.
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|base| Self::new(base.join("histview").join("filters")))
    }

    fn snapshot_path(&self, table: &TableId) -> PathBuf {
        let safe: String = table
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl FilterStore for JsonFileStore {
    fn save(&mut self, table: &TableId, snapshot: &QueryMap) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.snapshot_path(table);
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))?;
        tracing::debug!(table = %table, path = %path.display(), "persisted filter snapshot");
        Ok(())
    }

    fn restore(&self, table: &TableId) -> Result<Option<QueryMap>, StoreError> {
        let path = self.snapshot_path(table);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }
}
