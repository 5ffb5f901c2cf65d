//! Storage backends for entity store snapshots.
//!
//! # Responsibility
//! - Read and write snapshots as JSON, either in one combined file or one
//!   file per collection.
//! - Run document migrations before deserialization.
//!
//! # Invariants
//! - A missing file is an empty collection, never an error.
//! - Saves overwrite files in place; there is no write-then-rename step.
//! - Per-collection files are pretty-printed with 4-space indentation.
//! - Superseded legacy records are written only when there are any.

use super::migrations::{apply_migrations, latest_version, SCHEMA_VERSION_KEY, SUPERSEDED_KEY};
use super::{Snapshot, StoreError, StoreResult};
use crate::model::EntityKind;
use log::{error, info};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default file name of the combined layout.
pub const COMBINED_FILE_NAME: &str = "crm_data.json";

/// File of the split layout holding superseded legacy records.
pub const SUPERSEDED_FILE_NAME: &str = "superseded.json";

/// Persistence contract for full-state snapshots.
pub trait StoreBackend {
    /// Reads persisted state, or an empty snapshot when nothing is stored.
    fn load(&self) -> StoreResult<Snapshot>;
    /// Replaces persisted state with `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;
    /// Short description for log lines, e.g. `combined:/data/crm_data.json`.
    fn describe(&self) -> String;
}

impl<B: StoreBackend + ?Sized> StoreBackend for Box<B> {
    fn load(&self) -> StoreResult<Snapshot> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// All collections in one versioned JSON file.
#[derive(Debug, Clone)]
pub struct CombinedJsonBackend {
    path: PathBuf,
}

impl CombinedJsonBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreBackend for CombinedJsonBackend {
    fn load(&self) -> StoreResult<Snapshot> {
        logged("store_load", &self.describe(), || {
            let Some(document) = read_json(&self.path)? else {
                return Ok(Snapshot::default());
            };
            snapshot_from_document(document, &self.path)
        })
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        logged("store_save", &self.describe(), || {
            let mut document = to_value(snapshot, &self.path)?;
            if let Value::Object(object) = &mut document {
                object.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(latest_version()));
            }
            let bytes = serde_json::to_vec(&document).map_err(|source| StoreError::Serialize {
                path: self.path.clone(),
                source,
            })?;
            write_file(&self.path, &bytes)
        })
    }

    fn describe(&self) -> String {
        format!("combined:{}", self.path.display())
    }
}

/// One JSON file per collection inside a directory.
#[derive(Debug, Clone)]
pub struct SplitJsonBackend {
    dir: PathBuf,
}

impl SplitJsonBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding one collection.
    pub fn file_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    pub fn superseded_file(&self) -> PathBuf {
        self.dir.join(SUPERSEDED_FILE_NAME)
    }
}

impl StoreBackend for SplitJsonBackend {
    fn load(&self) -> StoreResult<Snapshot> {
        logged("store_load", &self.describe(), || {
            let mut document = Map::new();
            for kind in EntityKind::ALL.iter().copied() {
                let path = self.file_for(kind);
                if let Some(collection) = read_json(&path)? {
                    document.insert(kind.as_str().to_string(), collection);
                }
            }
            if let Some(superseded) = read_json(&self.superseded_file())? {
                document.insert(SUPERSEDED_KEY.to_string(), superseded);
            }
            snapshot_from_document(Value::Object(document), &self.dir)
        })
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        logged("store_save", &self.describe(), || {
            let document = to_value(snapshot, &self.dir)?;
            for kind in EntityKind::ALL.iter().copied() {
                let path = self.file_for(kind);
                let collection = document
                    .get(kind.as_str())
                    .cloned()
                    .unwrap_or(Value::Null);
                let bytes = to_pretty_bytes(&collection, &path)?;
                write_file(&path, &bytes)?;
            }
            if let Some(superseded) = document.get(SUPERSEDED_KEY) {
                let path = self.superseded_file();
                write_file(&path, &to_pretty_bytes(superseded, &path)?)?;
            }
            Ok(())
        })
    }

    fn describe(&self) -> String {
        format!("split:{}", self.dir.display())
    }
}

/// Keeps the serialized snapshot in memory.
///
/// Saves still go through JSON, so round-trips behave like the file
/// backends.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: RefCell<Option<Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON from the last save, if any.
    pub fn stored_json(&self) -> Option<String> {
        self.stored
            .borrow()
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> StoreResult<Snapshot> {
        let stored = self.stored.borrow();
        let Some(bytes) = stored.as_ref() else {
            return Ok(Snapshot::default());
        };
        let path = PathBuf::from(":memory:");
        let document = serde_json::from_slice(bytes)
            .map_err(|source| StoreError::Parse { path: path.clone(), source })?;
        snapshot_from_document(document, &path)
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let bytes = serde_json::to_vec(snapshot).map_err(|source| StoreError::Serialize {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        *self.stored.borrow_mut() = Some(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn logged<T>(
    event: &str,
    target: &str,
    op: impl FnOnce() -> StoreResult<T>,
) -> StoreResult<T> {
    let started_at = Instant::now();
    match op() {
        Ok(value) => {
            info!(
                "event={event} module=store status=ok target={target} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            error!(
                "event={event} module=store status=error target={target} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn read_json(path: &Path) -> StoreResult<Option<Value>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                "event=store_read module=store status=missing path={}",
                path.display()
            );
            return Ok(None);
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn snapshot_from_document(mut document: Value, origin: &Path) -> StoreResult<Snapshot> {
    apply_migrations(&mut document)?;
    let snapshot: Snapshot =
        serde_json::from_value(document).map_err(|source| StoreError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    info!(
        "event=store_snapshot module=store status=ok counts={}",
        snapshot.counts_summary()
    );
    Ok(snapshot)
}

fn to_value(snapshot: &Snapshot, origin: &Path) -> StoreResult<Value> {
    serde_json::to_value(snapshot).map_err(|source| StoreError::Serialize {
        path: origin.to_path_buf(),
        source,
    })
}

fn to_pretty_bytes(value: &Value, path: &Path) -> StoreResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, bytes).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::{MemoryBackend, StoreBackend};
    use crate::model::client::Client;
    use crate::store::Snapshot;

    #[test]
    fn memory_backend_starts_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.stored_json().is_none());
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn memory_backend_round_trips_through_json() {
        let backend = MemoryBackend::new();
        let mut snapshot = Snapshot::default();
        snapshot.clients.push(Client::new("Jane Doe"));

        backend.save(&snapshot).unwrap();
        assert!(backend.stored_json().unwrap().contains("Jane Doe"));
        assert_eq!(backend.load().unwrap(), snapshot);
    }
}
