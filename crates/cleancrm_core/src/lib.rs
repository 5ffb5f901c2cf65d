//! Core data model and JSON persistence for the cleaning-services CRM.
//! This crate is the single source of truth for entity shapes and the
//! load/save contract.

pub mod config;
pub mod display;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{StoreConfig, StoreLayout};
pub use display::{project, Table, Tabular};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::checklist::{ChecklistItem, CleaningChecklist, SalesScript};
pub use model::client::{AccountStatus, Client, ClientId, ContactMethod, ServiceTier};
pub use model::feedback::{Feedback, Rating};
pub use model::invoice::{Invoice, InvoiceStatus};
pub use model::property::{CleaningFrequency, Property, PropertyType};
pub use model::staff::{StaffMember, StaffRole};
pub use model::task::{Task, TaskPriority, TaskStatus};
pub use model::{EntityKind, ModelError};
pub use service::crm_service::CrmService;
pub use store::{
    CombinedJsonBackend, DanglingReference, EntityStore, MemoryBackend, Record, Snapshot,
    SplitJsonBackend, StoreBackend, StoreError, StoreResult, Superseded,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
