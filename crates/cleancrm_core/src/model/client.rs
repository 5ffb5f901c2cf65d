//! Client records.
//!
//! # Invariants
//! - `id` is a surrogate key; two clients may share a `name`.
//! - Other entities reference clients by `name`, not by `id`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Surrogate identifier assigned to every client.
pub type ClientId = Uuid;

text_enum! {
    /// How the client wants to be reached.
    ContactMethod {
        Email => "Email",
        Phone => "Phone",
        Sms => "SMS",
    }
}

text_enum! {
    /// Purchased service level.
    #[derive(Default)]
    ServiceTier {
        #[default]
        Basic => "Basic",
        Standard => "Standard",
        Premium => "Premium",
    }
}

text_enum! {
    /// Account lifecycle state.
    #[derive(Default)]
    AccountStatus {
        #[default]
        Active => "Active",
        Pending => "Pending",
        Inactive => "Inactive",
    }
}

/// A customer of the cleaning business.
///
/// Fields missing from older files fall back to defaults; a missing `id` is
/// generated on load and then persisted by the next save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default = "Uuid::new_v4")]
    pub id: ClientId,
    pub name: String,
    #[serde(default, alias = "contact")]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, alias = "preferred_contact_method")]
    pub preferred_contact: Option<ContactMethod>,
    #[serde(default)]
    pub service_tier: ServiceTier,
    #[serde(default, alias = "account_status")]
    pub status: AccountStatus,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    #[serde(default)]
    pub annual_spend: f64,
    #[serde(default)]
    pub notes: String,
}

impl Client {
    /// Creates an active `Basic` client with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            preferred_contact: None,
            service_tier: ServiceTier::default(),
            status: AccountStatus::default(),
            registration_date: None,
            annual_spend: 0.0,
            notes: String::new(),
        }
    }
}
