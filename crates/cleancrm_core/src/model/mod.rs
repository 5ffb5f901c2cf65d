//! Canonical CRM domain model.
//!
//! # Responsibility
//! - Define the persisted shape of every entity kind.
//! - Coerce form text into typed enum/date/number values.
//!
//! # Invariants
//! - Enum wire values match the labels shown on forms (`"Bi-weekly"`,
//!   `"In Progress"`), so persisted files stay human-readable.
//! - References between entities are plain names; existence is checked by
//!   the store at write time, never by the model.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declares a closed set of form choices with stable wire labels.
///
/// Generates `Serialize`/`Deserialize` using the labels, `Display`, and a
/// lenient `FromStr` that ignores case and `-`/`_`/space separators.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant, )+
        }

        impl $name {
            /// Every choice in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire and display label.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::model::ModelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::model::normalize_token(value);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|choice| $crate::model::normalize_token(choice.as_str()) == wanted)
                    .ok_or_else(|| $crate::model::ModelError::UnknownChoice {
                        field: stringify!($name),
                        value: value.trim().to_string(),
                    })
            }
        }
    };
}

pub mod checklist;
pub mod client;
pub mod feedback;
pub mod invoice;
pub mod property;
pub mod staff;
pub mod task;

/// Type-coercion failure for form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownChoice { field: &'static str, value: String },
    RatingOutOfRange(u8),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownChoice { field, value } => {
                write!(f, "`{value}` is not a valid {field}")
            }
            Self::RatingOutOfRange(value) => {
                write!(f, "rating must be between 1 and 5, got {value}")
            }
        }
    }
}

impl Error for ModelError {}

text_enum! {
    /// Every collection held by the entity store.
    EntityKind {
        Client => "clients",
        Property => "properties",
        Task => "tasks",
        Staff => "staff",
        Invoice => "invoices",
        Feedback => "feedback",
        Checklist => "checklists",
        SalesScript => "sales_scripts",
    }
}

impl EntityKind {
    /// Whether the collection is keyed (upsert) rather than appended.
    pub fn is_keyed(self) -> bool {
        matches!(
            self,
            Self::Property | Self::Task | Self::Staff | Self::Invoice | Self::Checklist
        )
    }

    /// Field that identifies a record in keyed collections.
    pub fn key_field(self) -> Option<&'static str> {
        match self {
            Self::Property => Some("address"),
            Self::Task | Self::Checklist => Some("property_address"),
            Self::Staff => Some("name"),
            Self::Invoice => Some("client_name"),
            Self::Client | Self::Feedback | Self::SalesScript => None,
        }
    }

    /// File name used by the per-collection storage layout.
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

pub(crate) fn normalize_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `None` for blank optional references.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
