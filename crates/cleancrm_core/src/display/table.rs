use crate::model::checklist::{CleaningChecklist, SalesScript};
use crate::model::client::Client;
use crate::model::feedback::Feedback;
use crate::model::invoice::Invoice;
use crate::model::property::Property;
use crate::model::staff::StaffMember;
use crate::model::task::Task;
use crate::model::EntityKind;
use crate::store::Snapshot;
use chrono::NaiveDate;
use std::fmt::Display;

/// Records that can be rendered as one table row.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    /// Cell text in `COLUMNS` order.
    fn cells(&self) -> Vec<String>;
}

/// Header plus rows of cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_records<'a, T, I>(records: I) -> Self
    where
        T: Tabular + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Self {
            columns: T::COLUMNS.iter().map(|column| column.to_string()).collect(),
            rows: records.into_iter().map(T::cells).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders left-aligned columns separated by two spaces.
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| column.chars().count())
            .collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &self.columns, &widths);
        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Projects one collection of `snapshot` into a table.
pub fn project(snapshot: &Snapshot, kind: EntityKind) -> Table {
    match kind {
        EntityKind::Client => Table::from_records(&snapshot.clients),
        EntityKind::Property => Table::from_records(snapshot.properties.values()),
        EntityKind::Task => Table::from_records(snapshot.tasks.values()),
        EntityKind::Staff => Table::from_records(snapshot.staff.values()),
        EntityKind::Invoice => Table::from_records(snapshot.invoices.values()),
        EntityKind::Feedback => Table::from_records(&snapshot.feedback),
        EntityKind::Checklist => Table::from_records(snapshot.checklists.values()),
        EntityKind::SalesScript => Table::from_records(&snapshot.sales_scripts),
    }
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn date(value: Option<NaiveDate>) -> String {
    opt(value.map(|date| date.format("%Y-%m-%d")))
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

impl Tabular for Client {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "email",
        "phone",
        "address",
        "preferred_contact",
        "service_tier",
        "status",
        "registration_date",
        "annual_spend",
        "notes",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.address.clone(),
            opt(self.preferred_contact),
            self.service_tier.to_string(),
            self.status.to_string(),
            date(self.registration_date),
            money(self.annual_spend),
            self.notes.clone(),
        ]
    }
}

impl Tabular for Property {
    const COLUMNS: &'static [&'static str] = &[
        "client_name",
        "address",
        "size",
        "property_type",
        "cleaning_frequency",
        "last_cleaned",
        "notes",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.client_name.clone(),
            self.address.clone(),
            self.size.clone(),
            self.property_type.to_string(),
            self.cleaning_frequency.to_string(),
            date(self.last_cleaned),
            self.notes.clone(),
        ]
    }
}

impl Tabular for Task {
    const COLUMNS: &'static [&'static str] = &[
        "task_name",
        "client_name",
        "property_address",
        "staff_assigned",
        "date",
        "priority",
        "status",
        "notes",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.task_name.clone(),
            self.client_name.clone(),
            self.property_address.clone(),
            self.assignee().unwrap_or_default().to_string(),
            date(self.date),
            opt(self.priority),
            self.status.to_string(),
            self.notes.clone(),
        ]
    }
}

impl Tabular for StaffMember {
    const COLUMNS: &'static [&'static str] = &["name", "role", "email", "phone", "schedule"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.role.to_string(),
            self.email.clone(),
            self.phone.clone(),
            self.schedule.clone(),
        ]
    }
}

impl Tabular for Invoice {
    const COLUMNS: &'static [&'static str] =
        &["client_name", "amount_due", "due_date", "status", "notes"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.client_name.clone(),
            money(self.amount_due),
            date(self.due_date),
            self.status.to_string(),
            self.notes.clone(),
        ]
    }
}

impl Tabular for Feedback {
    const COLUMNS: &'static [&'static str] = &["client_name", "rating", "comments", "submitted_on"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.client_name.clone(),
            self.rating.to_string(),
            self.comments.clone(),
            date(self.submitted_on),
        ]
    }
}

impl Tabular for CleaningChecklist {
    const COLUMNS: &'static [&'static str] = &["property_address", "progress", "items"];

    fn cells(&self) -> Vec<String> {
        let items = self
            .items
            .iter()
            .map(|item| {
                let mark = if item.done { "x" } else { " " };
                format!("[{mark}] {}", item.description)
            })
            .collect::<Vec<_>>()
            .join("; ");
        vec![
            self.property_address.clone(),
            format!("{}/{}", self.completed(), self.items.len()),
            items,
        ]
    }
}

impl Tabular for SalesScript {
    const COLUMNS: &'static [&'static str] = &["title", "audience", "body"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.audience
                .map_or_else(|| "Any".to_string(), |tier| tier.to_string()),
            self.body.replace('\n', " "),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::Table;

    #[test]
    fn render_text_pads_columns_to_widest_cell() {
        let table = Table {
            columns: vec!["name".to_string(), "tier".to_string()],
            rows: vec![
                vec!["Jane Doe".to_string(), "Premium".to_string()],
                vec!["Al".to_string(), "Basic".to_string()],
            ],
        };

        let rendered = table.render_text();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "name      tier");
        assert_eq!(lines[1], "--------  -------");
        assert_eq!(lines[2], "Jane Doe  Premium");
        assert_eq!(lines[3], "Al        Basic");
    }
}
