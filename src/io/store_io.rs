use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::lock::{LockError, StoreLock};
use crate::model::entry::Entry;

/// Name of the entry store inside the data directory
pub const STORE_FILE: &str = "entries.json";

/// Error type for entry store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize entries: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("no entry with id {0}")]
    NotFound(i64),
}

pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// Read all entries in stored order. A missing store is empty.
pub fn load_entries(data_dir: &Path) -> Result<Vec<Entry>, StoreError> {
    let path = store_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no entry store yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::ReadError { path, source: e }),
    };
    let entries: Vec<Entry> =
        serde_json::from_str(&text).map_err(|e| StoreError::ParseError {
            path: path.clone(),
            source: e,
        })?;
    tracing::debug!(path = %path.display(), count = entries.len(), "loaded entries");
    Ok(entries)
}

/// Replace the store with `entries`
pub fn save_entries(data_dir: &Path, entries: &[Entry]) -> Result<(), StoreError> {
    ensure_data_dir(data_dir)?;
    let _lock = StoreLock::acquire_default(data_dir)?;
    write_entries(data_dir, entries)
}

/// Load, modify and save the store while holding the lock
pub fn update_entries<T>(
    data_dir: &Path,
    f: impl FnOnce(&mut Vec<Entry>) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    ensure_data_dir(data_dir)?;
    let _lock = StoreLock::acquire_default(data_dir)?;
    let mut entries = load_entries(data_dir)?;
    let result = f(&mut entries)?;
    write_entries(data_dir, &entries)?;
    Ok(result)
}

fn ensure_data_dir(data_dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(data_dir).map_err(|e| StoreError::WriteError {
        path: data_dir.to_path_buf(),
        source: e,
    })
}

fn write_entries(data_dir: &Path, entries: &[Entry]) -> Result<(), StoreError> {
    let path = store_path(data_dir);
    let mut content = serde_json::to_string_pretty(entries)?;
    content.push('\n');
    atomic_write(&path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), count = entries.len(), "saved entries");
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory operations
// ---------------------------------------------------------------------------

/// Append an entry. Ids are not checked for collisions.
pub fn add_entry(entries: &mut Vec<Entry>, entry: Entry) {
    entries.push(entry);
}

/// First entry with the given id
pub fn find_entry(entries: &[Entry], id: i64) -> Option<&Entry> {
    entries.iter().find(|e| e.id == id)
}

/// Remove the first entry with the given id
pub fn remove_entry(entries: &mut Vec<Entry>, id: i64) -> Result<Entry, StoreError> {
    let idx = entries
        .iter()
        .position(|e| e.id == id)
        .ok_or(StoreError::NotFound(id))?;
    Ok(entries.remove(idx))
}

/// Swap the first entry with the given id for `replacement`, keeping its
/// position. Returns the old entry.
pub fn replace_entry(
    entries: &mut [Entry],
    id: i64,
    replacement: Entry,
) -> Result<Entry, StoreError> {
    let slot = entries
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or(StoreError::NotFound(id))?;
    Ok(std::mem::replace(slot, replacement))
}
