//! Field-level validation errors shared by items and locations.

use crate::model::location::{Facet, MAX_FACET_CHARS};
use crate::model::pantry_item::MAX_NAME_CHARS;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// First field that failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PantryValidationError {
    NameLength { actual: usize },
    InvalidQuantity(String),
    InvalidCost(String),
    UnknownCategory(String),
    UnknownAmount(String),
    InvalidDate { field: &'static str, value: String },
    ExpiryBeforePurchase { bought: NaiveDate, expiry: NaiveDate },
    UnknownFacet(String),
    EmptyFacet(Facet),
    FacetTooLong { facet: Facet, actual: usize },
    UnassignedLocation,
}

impl PantryValidationError {
    /// Name of the offending form field, for inline error display.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameLength { .. } => "name",
            Self::InvalidQuantity(_) => "quantity",
            Self::InvalidCost(_) => "cost",
            Self::UnknownCategory(_) => "category",
            Self::UnknownAmount(_) => "amount",
            Self::InvalidDate { field, .. } => *field,
            Self::ExpiryBeforePurchase { .. } => "date_expiry",
            Self::UnknownFacet(_) => "facet",
            Self::EmptyFacet(facet) | Self::FacetTooLong { facet, .. } => facet.as_str(),
            Self::UnassignedLocation => "location",
        }
    }
}

impl Display for PantryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameLength { actual } => write!(
                f,
                "name must be 1..={MAX_NAME_CHARS} characters, got {actual}"
            ),
            Self::InvalidQuantity(value) => {
                write!(f, "quantity must be a whole number >= 1, got `{value}`")
            }
            Self::InvalidCost(value) => write!(
                f,
                "cost must be a decimal with at most 2 fraction digits, got `{value}`"
            ),
            Self::UnknownCategory(value) => write!(
                f,
                "category must be one of food|hygiene|supplies|miscellaneous, got `{value}`"
            ),
            Self::UnknownAmount(value) => {
                write!(f, "amount must be one of empty|low|half|full, got `{value}`")
            }
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be a YYYY-MM-DD date, got `{value}`")
            }
            Self::ExpiryBeforePurchase { bought, expiry } => write!(
                f,
                "date_expiry ({expiry}) must be >= date_bought ({bought})"
            ),
            Self::UnknownFacet(value) => {
                write!(f, "facet must be one of room|noun|direction, got `{value}`")
            }
            Self::EmptyFacet(facet) => write!(f, "{} cannot be empty", facet.as_str()),
            Self::FacetTooLong { facet, actual } => write!(
                f,
                "{} must be at most {MAX_FACET_CHARS} characters, got {actual}",
                facet.as_str()
            ),
            Self::UnassignedLocation => {
                write!(f, "location needs at least one of room|noun|direction")
            }
        }
    }
}

impl Error for PantryValidationError {}
