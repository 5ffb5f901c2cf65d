//! Cleaning tasks. One active task per property address.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

text_enum! {
    #[derive(Default)]
    TaskStatus {
        #[default]
        Pending => "Pending",
        Assigned => "Assigned",
        InProgress => "In Progress",
        Completed => "Completed",
    }
}

text_enum! {
    TaskPriority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

/// Work scheduled at a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub client_name: String,
    pub property_address: String,
    /// Staff member name; blank or absent means unassigned.
    #[serde(default, alias = "assigned_staff")]
    pub staff_assigned: Option<String>,
    #[serde(default, alias = "deadline")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub notes: String,
}

impl Task {
    pub fn new(property_address: impl Into<String>) -> Self {
        Self {
            task_name: String::new(),
            client_name: String::new(),
            property_address: property_address.into(),
            staff_assigned: None,
            date: None,
            priority: None,
            status: TaskStatus::default(),
            notes: String::new(),
        }
    }

    /// Assigned staff name, ignoring blank form input.
    pub fn assignee(&self) -> Option<&str> {
        super::non_blank(self.staff_assigned.as_deref())
    }
}
