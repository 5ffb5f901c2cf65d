use cleancrm_core::{
    Client, CombinedJsonBackend, CrmService, EntityKind, MemoryBackend, Property, Record,
    ServiceTier, StoreBackend, StoreConfig, StoreError, StoreLayout,
};

#[test]
fn submit_adds_then_saves() {
    let mut service = CrmService::open(MemoryBackend::new()).unwrap();

    let mut jane = Client::new("Jane Doe");
    jane.service_tier = ServiceTier::Premium;
    jane.annual_spend = 900.0;
    service.submit(Record::Client(jane.clone())).unwrap();

    let persisted = service.backend().load().unwrap();
    assert_eq!(persisted.clients, vec![jane]);
}

#[test]
fn rejected_submission_does_not_save() {
    let mut service = CrmService::open(MemoryBackend::new()).unwrap();

    let err = service
        .submit(Record::Property(Property::new("Nobody", "9 Oak Ave")))
        .unwrap_err();

    assert!(matches!(err, StoreError::ReferenceNotFound { .. }));
    assert!(service.backend().stored_json().is_none());
}

#[test]
fn submissions_survive_reopening_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crm_data.json");

    let mut service = CrmService::open(CombinedJsonBackend::new(&path)).unwrap();
    service.submit(Record::Client(Client::new("Jane Doe"))).unwrap();
    service
        .submit(Record::Property(Property::new("Jane Doe", "12 Elm St")))
        .unwrap();
    let displaced = service
        .submit(Record::Property(Property::new("Jane Doe", "12 Elm St")))
        .unwrap();
    assert!(displaced.is_some());

    let reopened = CrmService::open(CombinedJsonBackend::new(&path)).unwrap();
    assert_eq!(reopened.store(), service.store());
    assert_eq!(reopened.store().properties().len(), 1);
}

#[test]
fn table_projects_current_collection() {
    let mut service = CrmService::open(MemoryBackend::new()).unwrap();
    service.submit(Record::Client(Client::new("Jane Doe"))).unwrap();
    service.submit(Record::Client(Client::new("Al"))).unwrap();

    let table = service.table(EntityKind::Client);
    assert_eq!(table.columns[0], "name");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], "Jane Doe");
    assert_eq!(table.rows[1][0], "Al");
    assert_eq!(table.rows[0][8], "0.00");

    assert!(service.table(EntityKind::Invoice).is_empty());
}

#[test]
fn config_backend_serves_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::for_layout(StoreLayout::Split, Some(dir.path().to_path_buf()));

    let mut service = CrmService::open(config.open_backend()).unwrap();
    service.submit(Record::Client(Client::new("Jane Doe"))).unwrap();

    assert!(dir.path().join("clients.json").exists());
    assert!(dir.path().join("sales_scripts.json").exists());
}
