//! In-memory entity store and JSON persistence boundary.
//!
//! # Responsibility
//! - Hold every CRM collection for one process run.
//! - Expose append (list collections) and upsert (keyed collections) writes.
//! - Load and save full snapshots through a `StoreBackend`.
//!
//! # Invariants
//! - Write paths check that referenced clients, properties and staff exist.
//! - Load paths accept dangling references from older files unchanged.
//! - Keyed collections hold at most one record per key; a second write under
//!   the same key replaces the whole record.
//! - Records displaced while rekeying list-shaped files stay in
//!   `Snapshot::superseded` and are saved back unchanged.

use crate::model::checklist::{CleaningChecklist, SalesScript};
use crate::model::client::Client;
use crate::model::feedback::Feedback;
use crate::model::invoice::Invoice;
use crate::model::property::Property;
use crate::model::staff::StaffMember;
use crate::model::task::Task;
use crate::model::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod backend;
mod entity_store;
pub mod migrations;

pub use backend::{CombinedJsonBackend, MemoryBackend, SplitJsonBackend, StoreBackend};
pub use entity_store::{DanglingReference, EntityStore, Record};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidDocument(String),
    UnsupportedSchemaVersion {
        found: u32,
        latest_supported: u32,
    },
    ReferenceNotFound {
        kind: EntityKind,
        key: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "malformed JSON in `{}`: {source}", path.display())
            }
            Self::Serialize { path, source } => {
                write!(f, "failed to serialize `{}`: {source}", path.display())
            }
            Self::InvalidDocument(message) => write!(f, "invalid persisted document: {message}"),
            Self::UnsupportedSchemaVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "store schema version {found} is newer than supported {latest_supported}"
            ),
            Self::ReferenceNotFound { kind, key } => {
                write!(f, "referenced {kind} record not found: `{key}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::Serialize { source, .. } => Some(source),
            Self::InvalidDocument(_)
            | Self::UnsupportedSchemaVersion { .. }
            | Self::ReferenceNotFound { .. } => None,
        }
    }
}

/// Full state of every collection, in its persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
    #[serde(default)]
    pub tasks: BTreeMap<String, Task>,
    #[serde(default)]
    pub staff: BTreeMap<String, StaffMember>,
    #[serde(default)]
    pub invoices: BTreeMap<String, Invoice>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
    #[serde(default)]
    pub checklists: BTreeMap<String, CleaningChecklist>,
    #[serde(default)]
    pub sales_scripts: Vec<SalesScript>,
    #[serde(default, skip_serializing_if = "Superseded::is_empty")]
    pub superseded: Superseded,
}

impl Snapshot {
    /// Number of records held by one collection.
    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Client => self.clients.len(),
            EntityKind::Property => self.properties.len(),
            EntityKind::Task => self.tasks.len(),
            EntityKind::Staff => self.staff.len(),
            EntityKind::Invoice => self.invoices.len(),
            EntityKind::Feedback => self.feedback.len(),
            EntityKind::Checklist => self.checklists.len(),
            EntityKind::SalesScript => self.sales_scripts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len_of(*kind) == 0) && self.superseded.is_empty()
    }

    /// Compact `kind=count` summary for log lines.
    pub(crate) fn counts_summary(&self) -> String {
        EntityKind::ALL
            .iter()
            .map(|kind| format!("{}={}", kind.as_str(), self.len_of(*kind)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Earlier records that shared a key with a later one in a list-shaped file.
///
/// List files appended every submission, so one address or name could appear
/// several times. The last occurrence becomes the current keyed record; the
/// rest are kept here in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Superseded {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub checklists: Vec<CleaningChecklist>,
}

impl Superseded {
    /// Number of superseded records for one keyed collection; zero otherwise.
    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Property => self.properties.len(),
            EntityKind::Task => self.tasks.len(),
            EntityKind::Staff => self.staff.len(),
            EntityKind::Invoice => self.invoices.len(),
            EntityKind::Checklist => self.checklists.len(),
            EntityKind::Client | EntityKind::Feedback | EntityKind::SalesScript => 0,
        }
    }

    pub fn len(&self) -> usize {
        EntityKind::ALL.iter().map(|kind| self.len_of(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
