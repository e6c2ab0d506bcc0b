//! Repository error type.

use crate::db::DbError;
use crate::model::location::{Facet, LocationId};
use crate::model::pantry_item::PantryItemId;
use crate::model::validation::PantryValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for pantry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed field validation; nothing was written.
    Validation(PantryValidationError),
    /// A location already uses this value for the facet.
    DuplicateFacet { facet: Facet, value: String },
    /// Referenced location row does not exist.
    LocationNotFound(LocationId),
    /// Item row does not exist.
    NotFound(PantryItemId),
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl RepoError {
    /// Field to highlight in the form, when the error maps to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation(err) => Some(err.field()),
            Self::DuplicateFacet { facet, .. } => Some(facet.as_str()),
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateFacet { facet, value } => {
                write!(f, "{} `{value}` already exists", facet.as_str())
            }
            Self::LocationNotFound(id) => write!(f, "location not found: {id}"),
            Self::NotFound(id) => write!(f, "pantry item not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "pantry repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted pantry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateFacet { .. }
            | Self::LocationNotFound(_)
            | Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<PantryValidationError> for RepoError {
    fn from(value: PantryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
