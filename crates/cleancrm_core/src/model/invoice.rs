//! Invoices. One open invoice per client name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

text_enum! {
    #[derive(Default)]
    InvoiceStatus {
        #[default]
        Unpaid => "Unpaid",
        Pending => "Pending",
        Paid => "Paid",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub client_name: String,
    #[serde(default)]
    pub amount_due: f64,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub notes: String,
}

impl Invoice {
    pub fn new(client_name: impl Into<String>, amount_due: f64) -> Self {
        Self {
            client_name: client_name.into(),
            amount_due,
            due_date: None,
            status: InvoiceStatus::default(),
            notes: String::new(),
        }
    }
}
