//! Cleaning checklists and sales-call scripts.

use super::client::ServiceTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl ChecklistItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            done: false,
        }
    }
}

/// Ordered checklist for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningChecklist {
    pub property_address: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl CleaningChecklist {
    /// Builds a checklist from item descriptions, skipping blank lines.
    pub fn from_lines<I, S>(property_address: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .map(ChecklistItem::new)
            .collect();
        Self {
            property_address: property_address.into(),
            items,
        }
    }

    pub fn completed(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }
}

/// Talking points for a sales call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesScript {
    pub title: String,
    /// Tier the script pitches; `None` means general purpose.
    #[serde(default)]
    pub audience: Option<ServiceTier>,
    #[serde(default)]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::CleaningChecklist;

    #[test]
    fn from_lines_skips_blank_entries() {
        let checklist =
            CleaningChecklist::from_lines("12 Elm St", ["Dust shelves", "  ", " Mop floors "]);
        assert_eq!(checklist.items.len(), 2);
        assert_eq!(checklist.items[1].description, "Mop floors");
        assert_eq!(checklist.completed(), 0);
    }
}
