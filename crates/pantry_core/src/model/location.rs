//! Storage location domain model.
//!
//! # Responsibility
//! - Define the three-facet location shape used by items and the form.
//! - Own facet normalization and human-readable labels.
//!
//! # Invariants
//! - A location is identified by its `(room, spot_noun, spot_direction)`
//!   triple; at most one row exists per triple.
//! - An unassigned facet is stored as [`UNASSIGNED_FACET`], never `NULL`.
//! - Normalized facet values are lowercase with `_` in place of whitespace.

use crate::model::validation::PantryValidationError;
use serde::{Deserialize, Serialize};

/// Auto-increment row id of `locations`.
pub type LocationId = i64;

/// Stored value for a facet that has not been chosen.
pub const UNASSIGNED_FACET: &str = "";

/// Maximum length (in characters) of a user-created facet value.
pub const MAX_FACET_CHARS: usize = 15;

/// One of the three independent dimensions of a storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// Room of the house, e.g. `kitchen`.
    Room,
    /// Piece of furniture or fixture, e.g. `cabinet`.
    Noun,
    /// Position relative to the noun, e.g. `top`.
    Direction,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Room, Facet::Noun, Facet::Direction];

    /// Stable external name used by the UI and FFI layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Noun => "noun",
            Self::Direction => "direction",
        }
    }

    /// Parses an external facet name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "room" => Some(Self::Room),
            "noun" | "spot_noun" => Some(Self::Noun),
            "direction" | "spot_direction" => Some(Self::Direction),
            _ => None,
        }
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Noun => "spot_noun",
            Self::Direction => "spot_direction",
        }
    }
}

/// Concrete facet combination that identifies a location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocationTriple {
    pub room: String,
    pub spot_noun: String,
    pub spot_direction: String,
}

impl LocationTriple {
    pub fn new(
        room: impl Into<String>,
        spot_noun: impl Into<String>,
        spot_direction: impl Into<String>,
    ) -> Self {
        Self {
            room: room.into(),
            spot_noun: spot_noun.into(),
            spot_direction: spot_direction.into(),
        }
    }

    /// Triple with only `facet` set and the other two unassigned.
    pub fn single_facet(facet: Facet, value: impl Into<String>) -> Self {
        let mut triple = Self::default();
        triple.set_facet(facet, value);
        triple
    }

    pub fn facet(&self, facet: Facet) -> &str {
        match facet {
            Facet::Room => &self.room,
            Facet::Noun => &self.spot_noun,
            Facet::Direction => &self.spot_direction,
        }
    }

    pub fn set_facet(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        match facet {
            Facet::Room => self.room = value,
            Facet::Noun => self.spot_noun = value,
            Facet::Direction => self.spot_direction = value,
        }
    }

    /// Returns whether every facet holds the unassigned placeholder.
    pub fn is_unassigned(&self) -> bool {
        Facet::ALL
            .iter()
            .all(|facet| self.facet(*facet) == UNASSIGNED_FACET)
    }

    /// Rejects triples that cannot identify a place to store an item.
    pub fn validate(&self) -> Result<(), PantryValidationError> {
        if self.is_unassigned() {
            return Err(PantryValidationError::UnassignedLocation);
        }
        Ok(())
    }
}

/// Persisted location row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub room: String,
    pub spot_noun: String,
    pub spot_direction: String,
}

impl Location {
    pub fn triple(&self) -> LocationTriple {
        LocationTriple::new(
            self.room.clone(),
            self.spot_noun.clone(),
            self.spot_direction.clone(),
        )
    }

    /// Label shown on the form, e.g. `Kitchen, Top Cabinet`.
    ///
    /// Unassigned facets are skipped.
    pub fn display_label(&self) -> String {
        let spot = [self.spot_direction.as_str(), self.spot_noun.as_str()]
            .into_iter()
            .filter(|value| !value.is_empty())
            .map(humanize_facet)
            .collect::<Vec<_>>()
            .join(" ");

        [humanize_facet(&self.room), spot]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Validates and normalizes user input for a new facet value.
///
/// Rules:
/// - surrounding whitespace is ignored;
/// - empty input and input longer than [`MAX_FACET_CHARS`] are rejected;
/// - the value is lowercased and whitespace runs become one `_`.
pub fn normalize_facet_value(facet: Facet, raw: &str) -> Result<String, PantryValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PantryValidationError::EmptyFacet(facet));
    }

    let actual = trimmed.chars().count();
    if actual > MAX_FACET_CHARS {
        return Err(PantryValidationError::FacetTooLong { facet, actual });
    }

    Ok(facet_match_key(trimmed))
}

/// Canonical form used to compare facet values: lowercase words joined by `_`.
///
/// Applies to stored values too, which may predate normalization.
pub fn facet_match_key(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Turns a stored facet value into title case words: `store_room` -> `Store Room`.
pub fn humanize_facet(value: &str) -> String {
    value
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
