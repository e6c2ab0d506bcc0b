//! Pantry item domain model.
//!
//! # Responsibility
//! - Define the unvalidated form draft and the validated insert shape.
//! - Own the field rules applied before any item row is written.
//!
//! # Invariants
//! - `name` holds 1..=40 characters after trimming.
//! - `cost` matches `^([0-9]+([.,][0-9]{0,2})?|[.,][0-9]{1,2})$`.
//! - `quantity` is a whole number >= 1.
//! - `date_expiry` is not earlier than `date_bought`.

use crate::model::location::LocationId;
use crate::model::validation::PantryValidationError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Auto-increment row id of `pantry_items`.
pub type PantryItemId = i64;

pub const MAX_NAME_CHARS: usize = 40;

/// Storage format of purchase/expiry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cost stored when the form leaves the field blank.
pub const DEFAULT_COST: &str = "0";

static COST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+([.,][0-9]{0,2})?|[.,][0-9]{1,2})$").expect("valid cost regex")
});

/// Item category chosen on the details page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Food,
    Hygiene,
    Supplies,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Hygiene,
        Category::Supplies,
        Category::Miscellaneous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Hygiene => "hygiene",
            Self::Supplies => "supplies",
            Self::Miscellaneous => "miscellaneous",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "food" => Some(Self::Food),
            "hygiene" => Some(Self::Hygiene),
            "supplies" => Some(Self::Supplies),
            "miscellaneous" => Some(Self::Miscellaneous),
            _ => None,
        }
    }
}

/// Remaining fill level of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    Empty,
    Low,
    Half,
    #[default]
    Full,
}

impl Amount {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Low => "low",
            Self::Half => "half",
            Self::Full => "full",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "empty" => Some(Self::Empty),
            "low" => Some(Self::Low),
            "half" => Some(Self::Half),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

/// Raw form values collected before persistence.
///
/// Every field is kept as entered so a failed submission can be shown
/// back to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PantryItemDraft {
    pub name: String,
    pub quantity: String,
    pub cost: String,
    pub category: String,
    /// `None` means the default fill level (`full`).
    #[serde(default)]
    pub amount: Option<String>,
    /// `YYYY-MM-DD`.
    pub date_bought: String,
    /// `YYYY-MM-DD`.
    pub date_expiry: String,
}

impl PantryItemDraft {
    /// Checks fields in form order and returns the insert shape.
    ///
    /// # Errors
    /// - Returns the first failing field: name, quantity, cost, category,
    ///   amount, date_bought, date_expiry, then the date ordering rule.
    pub fn validate(&self) -> Result<NewPantryItem, PantryValidationError> {
        let name = self.name.trim();
        let name_chars = name.chars().count();
        if name_chars == 0 || name_chars > MAX_NAME_CHARS {
            return Err(PantryValidationError::NameLength { actual: name_chars });
        }

        let quantity = parse_quantity(&self.quantity)?;
        let cost = normalize_cost(&self.cost)?;

        let category = Category::parse(self.category.trim())
            .ok_or_else(|| PantryValidationError::UnknownCategory(self.category.clone()))?;

        let amount = match self.amount.as_deref().map(str::trim) {
            None | Some("") => Amount::default(),
            Some(value) => Amount::parse(value)
                .ok_or_else(|| PantryValidationError::UnknownAmount(value.to_string()))?,
        };

        let date_bought = parse_date("date_bought", &self.date_bought)?;
        let date_expiry = parse_date("date_expiry", &self.date_expiry)?;
        if date_expiry < date_bought {
            return Err(PantryValidationError::ExpiryBeforePurchase {
                bought: date_bought,
                expiry: date_expiry,
            });
        }

        Ok(NewPantryItem {
            name: name.to_string(),
            date_bought,
            date_expiry,
            cost,
            quantity,
            category,
            amount,
            consumed: false,
        })
    }
}

/// Validated item ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPantryItem {
    pub name: String,
    pub date_bought: NaiveDate,
    pub date_expiry: NaiveDate,
    pub cost: String,
    pub quantity: u32,
    pub category: Category,
    pub amount: Amount,
    pub consumed: bool,
}

impl NewPantryItem {
    /// Re-checks field invariants for items not built through a draft.
    pub fn validate(&self) -> Result<(), PantryValidationError> {
        let name_chars = self.name.trim().chars().count();
        if name_chars == 0 || name_chars > MAX_NAME_CHARS {
            return Err(PantryValidationError::NameLength { actual: name_chars });
        }
        if self.quantity == 0 {
            return Err(PantryValidationError::InvalidQuantity(
                self.quantity.to_string(),
            ));
        }
        if !COST_RE.is_match(&self.cost) {
            return Err(PantryValidationError::InvalidCost(self.cost.clone()));
        }
        if self.date_expiry < self.date_bought {
            return Err(PantryValidationError::ExpiryBeforePurchase {
                bought: self.date_bought,
                expiry: self.date_expiry,
            });
        }
        Ok(())
    }
}

/// Persisted item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: PantryItemId,
    pub name: String,
    pub date_bought: NaiveDate,
    pub date_expiry: NaiveDate,
    pub cost: String,
    pub quantity: u32,
    pub category: Category,
    pub amount: Amount,
    pub consumed: bool,
    pub location_id: LocationId,
    /// Insert timestamp in epoch milliseconds.
    pub created_at: i64,
}

/// Blank cost becomes [`DEFAULT_COST`]; anything else must match the cost pattern.
pub fn normalize_cost(raw: &str) -> Result<String, PantryValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_COST.to_string());
    }
    if !COST_RE.is_match(trimmed) {
        return Err(PantryValidationError::InvalidCost(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parses a whole-number quantity >= 1.
pub fn parse_quantity(raw: &str) -> Result<u32, PantryValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(PantryValidationError::InvalidQuantity(raw.to_string()));
    }
    match trimmed.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(PantryValidationError::InvalidQuantity(raw.to_string())),
    }
}

pub(crate) fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, PantryValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        PantryValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        }
    })
}
