//! Entity store write and read APIs.

use super::{Snapshot, StoreBackend, StoreError, StoreResult, Superseded};
use crate::model::checklist::{CleaningChecklist, SalesScript};
use crate::model::client::Client;
use crate::model::feedback::Feedback;
use crate::model::invoice::Invoice;
use crate::model::non_blank;
use crate::model::property::Property;
use crate::model::staff::StaffMember;
use crate::model::task::Task;
use crate::model::EntityKind;
use log::debug;
use std::collections::BTreeMap;

/// One record of any kind, as produced by a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Client(Client),
    Property(Property),
    Task(Task),
    Staff(StaffMember),
    Invoice(Invoice),
    Feedback(Feedback),
    Checklist(CleaningChecklist),
    SalesScript(SalesScript),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Client(_) => EntityKind::Client,
            Self::Property(_) => EntityKind::Property,
            Self::Task(_) => EntityKind::Task,
            Self::Staff(_) => EntityKind::Staff,
            Self::Invoice(_) => EntityKind::Invoice,
            Self::Feedback(_) => EntityKind::Feedback,
            Self::Checklist(_) => EntityKind::Checklist,
            Self::SalesScript(_) => EntityKind::SalesScript,
        }
    }

    /// Human-facing label used in confirmations, e.g. the client name.
    pub fn label(&self) -> &str {
        match self {
            Self::Client(client) => &client.name,
            Self::Property(property) => &property.address,
            Self::Task(task) => &task.property_address,
            Self::Staff(member) => &member.name,
            Self::Invoice(invoice) => &invoice.client_name,
            Self::Feedback(feedback) => &feedback.client_name,
            Self::Checklist(checklist) => &checklist.property_address,
            Self::SalesScript(script) => &script.title,
        }
    }
}

/// A reference that points at a record which does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Collection holding the referencing record.
    pub from: EntityKind,
    /// Label of the referencing record.
    pub record: String,
    /// Collection the reference should resolve in.
    pub target: EntityKind,
    /// Unresolved name or address.
    pub key: String,
}

/// In-memory owner of every CRM collection.
///
/// Constructed per process run and passed explicitly to callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    snapshot: Snapshot,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Loads state from `backend`; a backend with nothing persisted yields an
    /// empty store.
    pub fn load<B: StoreBackend + ?Sized>(backend: &B) -> StoreResult<Self> {
        backend.load().map(Self::from_snapshot)
    }

    /// Writes every collection through `backend`, replacing earlier state.
    pub fn save<B: StoreBackend + ?Sized>(&self, backend: &B) -> StoreResult<()> {
        backend.save(&self.snapshot)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn clients(&self) -> &[Client] {
        &self.snapshot.clients
    }

    pub fn properties(&self) -> &BTreeMap<String, Property> {
        &self.snapshot.properties
    }

    pub fn tasks(&self) -> &BTreeMap<String, Task> {
        &self.snapshot.tasks
    }

    pub fn staff(&self) -> &BTreeMap<String, StaffMember> {
        &self.snapshot.staff
    }

    pub fn invoices(&self) -> &BTreeMap<String, Invoice> {
        &self.snapshot.invoices
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.snapshot.feedback
    }

    pub fn checklists(&self) -> &BTreeMap<String, CleaningChecklist> {
        &self.snapshot.checklists
    }

    pub fn sales_scripts(&self) -> &[SalesScript] {
        &self.snapshot.sales_scripts
    }

    /// Earlier duplicates kept from list-shaped files; never written to.
    pub fn superseded(&self) -> &Superseded {
        &self.snapshot.superseded
    }

    /// Clients sharing `name`, in insertion order.
    pub fn clients_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Client> + 'a {
        self.snapshot
            .clients
            .iter()
            .filter(move |client| client.name == name)
    }

    /// Dispatches one record to its collection.
    ///
    /// Returns the record displaced by an upsert, or `None` for appends and
    /// first writes under a key.
    pub fn add(&mut self, record: Record) -> StoreResult<Option<Record>> {
        let displaced = match record {
            Record::Client(client) => {
                self.add_client(client);
                None
            }
            Record::Property(property) => self.upsert_property(property)?.map(Record::Property),
            Record::Task(task) => self.upsert_task(task)?.map(Record::Task),
            Record::Staff(member) => self.upsert_staff(member).map(Record::Staff),
            Record::Invoice(invoice) => self.upsert_invoice(invoice)?.map(Record::Invoice),
            Record::Feedback(feedback) => {
                self.add_feedback(feedback)?;
                None
            }
            Record::Checklist(checklist) => {
                self.upsert_checklist(checklist)?.map(Record::Checklist)
            }
            Record::SalesScript(script) => {
                self.add_sales_script(script);
                None
            }
        };
        Ok(displaced)
    }

    /// Appends a client. Duplicate names are kept as separate records.
    pub fn add_client(&mut self, mut client: Client) {
        trim_key(&mut client.name);
        debug!(
            "event=store_add module=store kind=clients duplicate_name={}",
            self.clients_named(&client.name).next().is_some()
        );
        self.snapshot.clients.push(client);
    }

    /// Inserts or replaces the property at `property.address`.
    pub fn upsert_property(&mut self, mut property: Property) -> StoreResult<Option<Property>> {
        trim_key(&mut property.address);
        trim_key(&mut property.client_name);
        self.require_client(&property.client_name)?;
        Ok(upsert(
            &mut self.snapshot.properties,
            EntityKind::Property,
            property.address.clone(),
            property,
        ))
    }

    /// Inserts or replaces the active task for `task.property_address`.
    pub fn upsert_task(&mut self, mut task: Task) -> StoreResult<Option<Task>> {
        trim_key(&mut task.property_address);
        trim_key(&mut task.client_name);
        task.staff_assigned = non_blank(task.staff_assigned.as_deref()).map(str::to_string);
        self.require_property(&task.property_address)?;
        if let Some(client_name) = non_blank(Some(task.client_name.as_str())) {
            self.require_client(client_name)?;
        }
        if let Some(assignee) = task.assignee() {
            self.require_staff(assignee)?;
        }
        Ok(upsert(
            &mut self.snapshot.tasks,
            EntityKind::Task,
            task.property_address.clone(),
            task,
        ))
    }

    /// Inserts or replaces the staff member named `member.name`.
    pub fn upsert_staff(&mut self, mut member: StaffMember) -> Option<StaffMember> {
        trim_key(&mut member.name);
        upsert(
            &mut self.snapshot.staff,
            EntityKind::Staff,
            member.name.clone(),
            member,
        )
    }

    /// Inserts or replaces the invoice for `invoice.client_name`.
    pub fn upsert_invoice(&mut self, mut invoice: Invoice) -> StoreResult<Option<Invoice>> {
        trim_key(&mut invoice.client_name);
        self.require_client(&invoice.client_name)?;
        Ok(upsert(
            &mut self.snapshot.invoices,
            EntityKind::Invoice,
            invoice.client_name.clone(),
            invoice,
        ))
    }

    pub fn add_feedback(&mut self, mut feedback: Feedback) -> StoreResult<()> {
        trim_key(&mut feedback.client_name);
        self.require_client(&feedback.client_name)?;
        self.snapshot.feedback.push(feedback);
        Ok(())
    }

    /// Inserts or replaces the checklist for `checklist.property_address`.
    pub fn upsert_checklist(
        &mut self,
        mut checklist: CleaningChecklist,
    ) -> StoreResult<Option<CleaningChecklist>> {
        trim_key(&mut checklist.property_address);
        self.require_property(&checklist.property_address)?;
        Ok(upsert(
            &mut self.snapshot.checklists,
            EntityKind::Checklist,
            checklist.property_address.clone(),
            checklist,
        ))
    }

    pub fn add_sales_script(&mut self, script: SalesScript) {
        self.snapshot.sales_scripts.push(script);
    }

    /// Lists references that do not resolve, in collection order.
    ///
    /// Only data loaded from disk can produce entries; writes through this
    /// store are checked up front.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        let mut check = |from: EntityKind, record: &str, target: EntityKind, key: &str| {
            if !self.contains(target, key) {
                dangling.push(DanglingReference {
                    from,
                    record: record.to_string(),
                    target,
                    key: key.to_string(),
                });
            }
        };

        for property in self.snapshot.properties.values() {
            check(
                EntityKind::Property,
                &property.address,
                EntityKind::Client,
                &property.client_name,
            );
        }
        for task in self.snapshot.tasks.values() {
            let record = task.property_address.as_str();
            check(EntityKind::Task, record, EntityKind::Property, record);
            if let Some(client_name) = non_blank(Some(task.client_name.as_str())) {
                check(EntityKind::Task, record, EntityKind::Client, client_name);
            }
            if let Some(assignee) = task.assignee() {
                check(EntityKind::Task, record, EntityKind::Staff, assignee);
            }
        }
        for invoice in self.snapshot.invoices.values() {
            check(
                EntityKind::Invoice,
                &invoice.client_name,
                EntityKind::Client,
                &invoice.client_name,
            );
        }
        for feedback in &self.snapshot.feedback {
            check(
                EntityKind::Feedback,
                &feedback.client_name,
                EntityKind::Client,
                &feedback.client_name,
            );
        }
        for checklist in self.snapshot.checklists.values() {
            let record = checklist.property_address.as_str();
            check(EntityKind::Checklist, record, EntityKind::Property, record);
        }

        dangling
    }

    fn contains(&self, kind: EntityKind, key: &str) -> bool {
        match kind {
            EntityKind::Client => self.clients_named(key).next().is_some(),
            EntityKind::Property => self.snapshot.properties.contains_key(key),
            EntityKind::Staff => self.snapshot.staff.contains_key(key),
            EntityKind::Task => self.snapshot.tasks.contains_key(key),
            EntityKind::Invoice => self.snapshot.invoices.contains_key(key),
            EntityKind::Checklist => self.snapshot.checklists.contains_key(key),
            EntityKind::Feedback | EntityKind::SalesScript => false,
        }
    }

    fn require(&self, kind: EntityKind, key: &str) -> StoreResult<()> {
        if self.contains(kind, key) {
            return Ok(());
        }
        Err(StoreError::ReferenceNotFound {
            kind,
            key: key.to_string(),
        })
    }

    fn require_client(&self, name: &str) -> StoreResult<()> {
        self.require(EntityKind::Client, name)
    }

    fn require_property(&self, address: &str) -> StoreResult<()> {
        self.require(EntityKind::Property, address)
    }

    fn require_staff(&self, name: &str) -> StoreResult<()> {
        self.require(EntityKind::Staff, name)
    }
}

/// Names and addresses are keys on one side and references on the other;
/// both sides are trimmed so they compare equal.
fn trim_key(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn upsert<V>(map: &mut BTreeMap<String, V>, kind: EntityKind, key: String, value: V) -> Option<V> {
    let previous = map.insert(key, value);
    if previous.is_some() {
        debug!(
            "event=store_upsert module=store kind={} status=replaced",
            kind.as_str()
        );
    }
    previous
}

#[cfg(test)]
mod tests {
    use super::{EntityStore, Record};
    use crate::model::client::Client;
    use crate::model::property::Property;
    use crate::model::staff::{StaffMember, StaffRole};
    use crate::model::task::Task;
    use crate::model::EntityKind;

    #[test]
    fn add_dispatches_by_record_kind() {
        let mut store = EntityStore::new();
        store.add(Record::Client(Client::new("Jane Doe"))).unwrap();
        store
            .add(Record::Property(Property::new("Jane Doe", "12 Elm St")))
            .unwrap();

        let displaced = store
            .add(Record::Property(Property::new("Jane Doe", "12 Elm St")))
            .unwrap()
            .expect("second write under same address should displace");
        assert_eq!(displaced.kind(), EntityKind::Property);
        assert_eq!(displaced.label(), "12 Elm St");
    }

    #[test]
    fn dangling_references_is_empty_for_checked_writes() {
        let mut store = EntityStore::new();
        store.add_client(Client::new("Jane Doe"));
        store.upsert_staff(StaffMember::new("Sam", StaffRole::Cleaner));
        store
            .upsert_property(Property::new("Jane Doe", "12 Elm St"))
            .unwrap();
        assert!(store.dangling_references().is_empty());
    }

    #[test]
    fn keys_and_references_are_trimmed_alike() {
        let mut store = EntityStore::new();
        store.add_client(Client::new(" Jane Doe"));
        store.upsert_staff(StaffMember::new("Sam ", StaffRole::Cleaner));
        store
            .upsert_property(Property::new("Jane Doe ", " 12 Elm St "))
            .unwrap();

        let mut task = Task::new("12 Elm St");
        task.staff_assigned = Some("Sam".to_string());
        store.upsert_task(task).unwrap();

        assert!(store.staff().contains_key("Sam"));
        assert!(store.properties().contains_key("12 Elm St"));
        assert_eq!(store.clients()[0].name, "Jane Doe");
        assert_eq!(store.tasks()["12 Elm St"].assignee(), Some("Sam"));
        assert!(store.dangling_references().is_empty());
    }

    #[test]
    fn blank_assignee_is_stored_as_unassigned() {
        let mut store = EntityStore::new();
        store.add_client(Client::new("Jane Doe"));
        store
            .upsert_property(Property::new("Jane Doe", "12 Elm St"))
            .unwrap();

        let mut task = Task::new("12 Elm St");
        task.staff_assigned = Some("   ".to_string());
        store.upsert_task(task).unwrap();

        assert_eq!(store.tasks()["12 Elm St"].staff_assigned, None);
    }
}
