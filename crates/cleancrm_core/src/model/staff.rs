//! Staff members, keyed by name.

use serde::{Deserialize, Serialize};

text_enum! {
    #[derive(Default)]
    StaffRole {
        #[default]
        Cleaner => "Cleaner",
        Supervisor => "Supervisor",
        Manager => "Manager",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,
    #[serde(default, alias = "contact")]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: StaffRole,
    /// Free-text availability, e.g. "Mon-Fri mornings".
    #[serde(default, alias = "availability")]
    pub schedule: String,
}

impl StaffMember {
    pub fn new(name: impl Into<String>, role: StaffRole) -> Self {
        Self {
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            role,
            schedule: String::new(),
        }
    }
}
