//! Persisted document migrations.
//!
//! # Responsibility
//! - Register document migrations in strictly increasing order.
//! - Upgrade documents written by older releases before deserialization.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - A document without `schema_version` is version 1 (legacy list layout).
//! - Every migration is idempotent on already-upgraded input.

use super::{StoreError, StoreResult};
use crate::model::EntityKind;
use log::info;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Key carrying the document version in combined files.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Key of the section holding earlier records displaced during migration.
pub const SUPERSEDED_KEY: &str = "superseded";

const LEGACY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    apply: fn(&mut Map<String, Value>) -> StoreResult<()>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    name: "normalize_keyed_collections",
    apply: normalize_keyed_collections,
}];

/// Returns the latest document version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS
        .last()
        .map_or(LEGACY_VERSION, |migration| migration.version)
}

/// Reads `schema_version` from a document, defaulting to the legacy version.
pub fn document_version(document: &Map<String, Value>) -> StoreResult<u32> {
    match document.get(SCHEMA_VERSION_KEY) {
        None | Some(Value::Null) => Ok(LEGACY_VERSION),
        Some(value) => value
            .as_u64()
            .and_then(|version| u32::try_from(version).ok())
            .ok_or_else(|| {
                StoreError::InvalidDocument(format!("invalid {SCHEMA_VERSION_KEY} value `{value}`"))
            }),
    }
}

/// Applies all pending migrations and stamps the latest version.
///
/// Returns the version the document had before migrating.
pub fn apply_migrations(document: &mut Value) -> StoreResult<u32> {
    let object = document.as_object_mut().ok_or_else(|| {
        StoreError::InvalidDocument("top-level JSON value must be an object".to_string())
    })?;

    let current = document_version(object)?;
    let latest = latest_version();
    if current > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        (migration.apply)(object)?;
        info!(
            "event=store_migrate module=store status=ok migration={} to_version={}",
            migration.name, migration.version
        );
    }

    object.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(latest));
    Ok(current)
}

/// Normalizes keyed collections written by the list-based and map-based
/// releases.
///
/// - Arrays become objects keyed by `key_field`. The list release never
///   overwrote, so only the last record per key becomes current; earlier
///   ones move to `superseded.<collection>` in file order.
/// - Object bodies that lack `key_field` get it from their map key.
fn normalize_keyed_collections(document: &mut Map<String, Value>) -> StoreResult<()> {
    for kind in EntityKind::ALL.iter().copied() {
        let Some(key_field) = kind.key_field() else {
            continue;
        };
        let Some(collection) = document.get_mut(kind.as_str()) else {
            continue;
        };
        let overflow = match collection {
            Value::Array(records) => {
                let (keyed, overflow) = rekey_records(kind, key_field, std::mem::take(records))?;
                *collection = Value::Object(keyed);
                overflow
            }
            Value::Object(keyed) => {
                for (key, body) in keyed.iter_mut() {
                    if let Value::Object(fields) = body {
                        fields
                            .entry(key_field)
                            .or_insert_with(|| Value::String(key.clone()));
                    }
                }
                continue;
            }
            _ => continue,
        };
        if !overflow.is_empty() {
            info!(
                "event=store_migrate module=store status=ok kind={} superseded={}",
                kind.as_str(),
                overflow.len()
            );
            append_superseded(document, kind, overflow)?;
        }
    }
    Ok(())
}

fn rekey_records(
    kind: EntityKind,
    key_field: &str,
    records: Vec<Value>,
) -> StoreResult<(Map<String, Value>, Vec<Value>)> {
    let mut keys = Vec::with_capacity(records.len());
    for record in &records {
        let key = record
            .get(key_field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StoreError::InvalidDocument(format!(
                    "{} record is missing string field `{key_field}`",
                    kind.as_str()
                ))
            })?;
        keys.push(key.to_string());
    }

    let mut last_index = HashMap::new();
    for (index, key) in keys.iter().enumerate() {
        last_index.insert(key.as_str(), index);
    }

    let mut keyed = Map::new();
    let mut overflow = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        let key = &keys[index];
        if last_index.get(key.as_str()) == Some(&index) {
            keyed.insert(key.clone(), record);
        } else {
            overflow.push(record);
        }
    }
    Ok((keyed, overflow))
}

fn append_superseded(
    document: &mut Map<String, Value>,
    kind: EntityKind,
    records: Vec<Value>,
) -> StoreResult<()> {
    let section = document
        .entry(SUPERSEDED_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            StoreError::InvalidDocument(format!("`{SUPERSEDED_KEY}` must be an object"))
        })?;
    let existing = section
        .entry(kind.as_str())
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| {
            StoreError::InvalidDocument(format!(
                "`{SUPERSEDED_KEY}.{}` must be an array",
                kind.as_str()
            ))
        })?;
    existing.extend(records);
    Ok(())
}
