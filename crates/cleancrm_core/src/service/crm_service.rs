//! CRM form submission service.
//!
//! # Responsibility
//! - Load state once when opened.
//! - Apply exactly one add/upsert followed by one save per submission.
//!
//! # Invariants
//! - A rejected submission (missing reference) performs no save.
//! - Service layer remains storage-agnostic.

use crate::display::{project, Table};
use crate::model::EntityKind;
use crate::store::{DanglingReference, EntityStore, Record, StoreBackend, StoreResult};
use log::{info, warn};

/// Use-case service over an entity store and its backend.
pub struct CrmService<B: StoreBackend> {
    backend: B,
    store: EntityStore,
}

impl<B: StoreBackend> CrmService<B> {
    /// Loads current state from `backend`.
    pub fn open(backend: B) -> StoreResult<Self> {
        let store = EntityStore::load(&backend)?;
        let dangling = store.dangling_references().len();
        if dangling > 0 {
            warn!(
                "event=store_open module=service status=ok backend={} dangling_references={dangling}",
                backend.describe()
            );
        } else {
            info!(
                "event=store_open module=service status=ok backend={}",
                backend.describe()
            );
        }
        Ok(Self { backend, store })
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Adds one record and saves the full state.
    ///
    /// Returns the record replaced by a keyed upsert, if any.
    pub fn submit(&mut self, record: Record) -> StoreResult<Option<Record>> {
        let kind = record.kind();
        let displaced = match self.store.add(record) {
            Ok(displaced) => displaced,
            Err(err) => {
                warn!(
                    "event=form_submit module=service status=rejected kind={} error={}",
                    kind.as_str(),
                    err
                );
                return Err(err);
            }
        };
        self.store.save(&self.backend)?;
        info!(
            "event=form_submit module=service status=ok kind={} replaced={}",
            kind.as_str(),
            displaced.is_some()
        );
        Ok(displaced)
    }

    /// Tabular view of one collection.
    pub fn table(&self, kind: EntityKind) -> Table {
        project(self.store.snapshot(), kind)
    }

    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        self.store.dangling_references()
    }

    pub fn into_store(self) -> EntityStore {
        self.store
    }
}
