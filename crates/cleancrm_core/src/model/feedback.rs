//! Client feedback and star ratings.

use super::ModelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ModelError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::RatingOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub client_name: String,
    pub rating: Rating,
    #[serde(default, alias = "feedback")]
    pub comments: String,
    #[serde(default)]
    pub submitted_on: Option<NaiveDate>,
}

impl Feedback {
    pub fn new(client_name: impl Into<String>, rating: Rating) -> Self {
        Self {
            client_name: client_name.into(),
            rating,
            comments: String::new(),
            submitted_on: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Feedback, Rating};
    use crate::model::ModelError;

    #[test]
    fn rating_rejects_values_outside_stars() {
        assert_eq!(Rating::new(0).unwrap_err(), ModelError::RatingOutOfRange(0));
        assert_eq!(Rating::new(6).unwrap_err(), ModelError::RatingOutOfRange(6));
        assert_eq!(Rating::new(5).unwrap().get(), 5);
    }

    #[test]
    fn deserialize_rejects_out_of_range_rating() {
        let value = serde_json::json!({ "client_name": "Jane Doe", "rating": 9 });
        let err = serde_json::from_value::<Feedback>(value).unwrap_err();
        assert!(err.to_string().contains("between 1 and 5"), "{err}");
    }
}
