use chrono::NaiveDate;
use cleancrm_core::store::migrations::latest_version;
use cleancrm_core::{
    CleaningFrequency, CombinedJsonBackend, EntityKind, EntityStore, InvoiceStatus, ServiceTier,
    SplitJsonBackend, StaffRole, TaskPriority, TaskStatus,
};
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

/// Files in the shape written by the first, list-based release.
fn write_legacy_split_files(dir: &Path) {
    write(
        dir,
        "clients.json",
        r#"[
    {
        "name": "Jane Doe",
        "phone": "555-0100",
        "email": "jane@example.com",
        "address": "12 Elm St",
        "service_tier": "Premium",
        "notes": ""
    }
]"#,
    );
    write(
        dir,
        "properties.json",
        r#"[
    {
        "client_name": "Jane Doe",
        "address": "12 Elm St",
        "cleaning_frequency": "Weekly",
        "notes": "dog on site"
    }
]"#,
    );
    write(
        dir,
        "tasks.json",
        r#"[
    {
        "task_name": "Spring clean",
        "client_name": "Jane Doe",
        "property_address": "12 Elm St",
        "staff_assigned": "Sam",
        "deadline": "2024-04-01",
        "priority": "High",
        "status": "Pending"
    },
    {
        "task_name": "Windows",
        "client_name": "Jane Doe",
        "property_address": "12 Elm St",
        "staff_assigned": "Sam",
        "deadline": "2024-04-08",
        "priority": "Low",
        "status": "In Progress"
    }
]"#,
    );
    write(
        dir,
        "staff.json",
        r#"[
    {
        "name": "Sam",
        "role": "Supervisor",
        "phone": "555-0199",
        "email": "sam@example.com",
        "schedule": "Mon-Fri"
    }
]"#,
    );
    write(
        dir,
        "invoices.json",
        r#"[
    {
        "client_name": "Ghost Corp",
        "amount_due": 75.0,
        "due_date": "2024-05-01",
        "status": "Unpaid"
    }
]"#,
    );
}

#[test]
fn legacy_split_files_load_into_keyed_collections() {
    let dir = tempfile::tempdir().unwrap();
    write_legacy_split_files(dir.path());

    let store = EntityStore::load(&SplitJsonBackend::new(dir.path())).unwrap();

    assert_eq!(store.clients().len(), 1);
    let jane = &store.clients()[0];
    assert_eq!(jane.service_tier, ServiceTier::Premium);
    assert!(!jane.id.is_nil());

    let property = &store.properties()["12 Elm St"];
    assert_eq!(property.cleaning_frequency, CleaningFrequency::Weekly);
    assert_eq!(property.notes, "dog on site");

    // The later of two tasks for one address is current; the earlier is kept.
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.superseded().tasks.len(), 1);
    assert_eq!(store.superseded().tasks[0].task_name, "Spring clean");
    assert_eq!(
        store.superseded().tasks[0].date,
        NaiveDate::from_ymd_opt(2024, 4, 1)
    );
    let task = &store.tasks()["12 Elm St"];
    assert_eq!(task.task_name, "Windows");
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.priority, Some(TaskPriority::Low));
    assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 4, 8));

    assert_eq!(store.staff()["Sam"].role, StaffRole::Supervisor);
    assert_eq!(store.invoices()["Ghost Corp"].amount_due, 75.0);

    assert!(store.feedback().is_empty());
    assert!(store.sales_scripts().is_empty());
}

#[test]
fn legacy_dangling_references_are_tolerated_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_legacy_split_files(dir.path());

    let store = EntityStore::load(&SplitJsonBackend::new(dir.path())).unwrap();
    let dangling = store.dangling_references();

    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].from, EntityKind::Invoice);
    assert_eq!(dangling[0].target, EntityKind::Client);
    assert_eq!(dangling[0].key, "Ghost Corp");
}

#[test]
fn resaving_legacy_files_writes_canonical_shapes() {
    let dir = tempfile::tempdir().unwrap();
    write_legacy_split_files(dir.path());
    let backend = SplitJsonBackend::new(dir.path());

    let store = EntityStore::load(&backend).unwrap();
    store.save(&backend).unwrap();

    let tasks: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(backend.file_for(EntityKind::Task)).unwrap())
            .unwrap();
    assert!(tasks.is_object());
    assert_eq!(tasks["12 Elm St"]["date"], "2024-04-08");
    assert!(tasks["12 Elm St"].get("deadline").is_none());

    let clients: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(backend.file_for(EntityKind::Client)).unwrap())
            .unwrap();
    let first_id = clients[0]["id"].clone();
    assert!(first_id.is_string());

    let superseded: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(backend.superseded_file()).unwrap()).unwrap();
    assert_eq!(superseded["tasks"][0]["task_name"], "Spring clean");

    let reloaded = EntityStore::load(&backend).unwrap();
    assert_eq!(reloaded, store);
    assert_eq!(reloaded.superseded().tasks.len(), 1);
}

#[test]
fn split_files_without_duplicates_write_no_superseded_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "staff.json", r#"[{ "name": "Sam" }]"#);
    let backend = SplitJsonBackend::new(dir.path());

    let store = EntityStore::load(&backend).unwrap();
    store.save(&backend).unwrap();

    assert!(store.superseded().is_empty());
    assert!(!backend.superseded_file().exists());
}

#[test]
fn duplicate_legacy_invoices_all_survive_a_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crm_data.json");
    fs::write(
        &path,
        r#"{
            "clients": [{ "name": "Jane Doe" }],
            "invoices": [
                { "client_name": "Jane Doe", "amount_due": 100.0, "status": "Paid" },
                { "client_name": "Jane Doe", "amount_due": 250.0, "status": "Unpaid" }
            ]
        }"#,
    )
    .unwrap();
    let backend = CombinedJsonBackend::new(&path);

    let store = EntityStore::load(&backend).unwrap();
    store.save(&backend).unwrap();
    let reloaded = EntityStore::load(&backend).unwrap();

    let current = &reloaded.invoices()["Jane Doe"];
    assert_eq!(current.amount_due, 250.0);
    assert_eq!(current.status, InvoiceStatus::Unpaid);
    let earlier = &reloaded.superseded().invoices;
    assert_eq!(earlier.len(), 1);
    assert_eq!(earlier[0].amount_due, 100.0);
    assert_eq!(earlier[0].status, InvoiceStatus::Paid);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["superseded"]["invoices"][0]["amount_due"], 100.0);
}

#[test]
fn keyed_bodies_without_their_key_field_load_by_map_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crm_data.json");
    fs::write(
        &path,
        r#"{
            "clients": [],
            "staff": { "Sam": { "contact": "sam@x", "role": "Cleaner", "availability": "weekends" } },
            "properties": { "12 Elm St": { "client_name": "Jane Doe", "notes": "side gate" } }
        }"#,
    )
    .unwrap();
    let backend = CombinedJsonBackend::new(&path);

    let store = EntityStore::load(&backend).unwrap();
    let sam = &store.staff()["Sam"];
    assert_eq!(sam.name, "Sam");
    assert_eq!(sam.email, "sam@x");
    assert_eq!(sam.schedule, "weekends");
    assert_eq!(store.properties()["12 Elm St"].address, "12 Elm St");

    store.save(&backend).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["staff"]["Sam"]["name"], "Sam");
}

#[test]
fn unversioned_combined_file_is_migrated_and_stamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crm_data.json");
    fs::write(
        &path,
        r#"{
            "clients": [{ "name": "Jane Doe", "contact": "jane@example.com", "account_status": "Pending" }],
            "staff": { "Sam": { "name": "Sam", "availability": "weekends" } },
            "invoices": { "Jane Doe": { "client_name": "Jane Doe", "amount_due": 40, "status": "Pending" } }
        }"#,
    )
    .unwrap();
    let backend = CombinedJsonBackend::new(&path);

    let store = EntityStore::load(&backend).unwrap();
    assert_eq!(store.clients()[0].email, "jane@example.com");
    assert_eq!(store.staff()["Sam"].schedule, "weekends");
    assert_eq!(store.invoices()["Jane Doe"].amount_due, 40.0);

    store.save(&backend).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["schema_version"], latest_version());
    assert_eq!(raw["clients"][0]["status"], "Pending");
}
