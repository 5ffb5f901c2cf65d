//! Property records, keyed by street address.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

text_enum! {
    #[derive(Default)]
    PropertyType {
        #[default]
        Residential => "Residential",
        Commercial => "Commercial",
    }
}

text_enum! {
    /// Visit cadence agreed with the client.
    #[derive(Default)]
    CleaningFrequency {
        Daily => "Daily",
        #[default]
        Weekly => "Weekly",
        BiWeekly => "Bi-weekly",
        Monthly => "Monthly",
    }
}

/// A site serviced for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Owning client, matched by name.
    pub client_name: String,
    pub address: String,
    #[serde(default)]
    pub size: String,
    #[serde(default, alias = "type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub cleaning_frequency: CleaningFrequency,
    #[serde(default)]
    pub last_cleaned: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    /// Attachment names collected by the form. Never written to disk.
    #[serde(skip)]
    pub photos: Vec<String>,
}

impl Property {
    pub fn new(client_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            address: address.into(),
            size: String::new(),
            property_type: PropertyType::default(),
            cleaning_frequency: CleaningFrequency::default(),
            last_cleaned: None,
            notes: String::new(),
            photos: Vec::new(),
        }
    }
}
