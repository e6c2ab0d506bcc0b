//! Location repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Find-or-create location rows from a facet triple.
//! - Create single-facet locations from the "add new" flows.
//! - Serve distinct facet values for the location chips.
//!
//! # Invariants
//! - Lookup-before-insert runs inside one `IMMEDIATE` transaction, backed by
//!   the `idx_locations_triple` unique index.
//! - Facet duplicate checks compare normalized forms of both the new and the
//!   stored values, since `resolve` stores selections as given.
//! - Facet options never contain the unassigned placeholder.

use crate::model::location::{
    facet_match_key, normalize_facet_value, Facet, Location, LocationId, LocationTriple,
    UNASSIGNED_FACET,
};
use crate::repo::{RepoError, RepoResult, SqlitePantryStore};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};

const LOCATION_SELECT_SQL: &str = "SELECT
    id,
    room,
    spot_noun,
    spot_direction
FROM locations";

/// Outcome of resolving a triple to a location row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub id: LocationId,
    /// `true` when the row was inserted by this call.
    pub created: bool,
}

/// Distinct assigned values per facet, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptions {
    pub rooms: Vec<String>,
    pub nouns: Vec<String>,
    pub directions: Vec<String>,
}

impl FacetOptions {
    pub fn values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Room => &self.rooms,
            Facet::Noun => &self.nouns,
            Facet::Direction => &self.directions,
        }
    }
}

/// Repository interface for location operations.
pub trait LocationRepository {
    /// Returns the id of the row matching `triple`, inserting it when missing.
    fn resolve_location(&mut self, triple: &LocationTriple) -> RepoResult<ResolvedLocation>;
    /// Normalizes `value` and inserts a row with only `facet` assigned.
    fn create_facet_location(&mut self, facet: Facet, value: &str) -> RepoResult<Location>;
    /// Loads one location by id.
    fn get_location(&self, id: LocationId) -> RepoResult<Option<Location>>;
    /// Lists all locations ordered by id.
    fn list_locations(&self) -> RepoResult<Vec<Location>>;
    /// Collects distinct assigned values for every facet.
    fn facet_options(&self) -> RepoResult<FacetOptions>;
}

impl LocationRepository for SqlitePantryStore<'_> {
    fn resolve_location(&mut self, triple: &LocationTriple) -> RepoResult<ResolvedLocation> {
        triple.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let resolved = resolve_location_in(&tx, triple)?;
        tx.commit()?;
        Ok(resolved)
    }

    fn create_facet_location(&mut self, facet: Facet, value: &str) -> RepoResult<Location> {
        let normalized = normalize_facet_value(facet, value)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if facet_value_exists(&tx, facet, &normalized)? {
            return Err(RepoError::DuplicateFacet {
                facet,
                value: normalized,
            });
        }

        let triple = LocationTriple::single_facet(facet, normalized);
        let id = insert_location(&tx, &triple)?;
        tx.commit()?;

        Ok(Location {
            id,
            room: triple.room,
            spot_noun: triple.spot_noun,
            spot_direction: triple.spot_direction,
        })
    }

    fn get_location(&self, id: LocationId) -> RepoResult<Option<Location>> {
        let location = self
            .conn
            .query_row(
                &format!("{LOCATION_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_location_row,
            )
            .optional()?;
        Ok(location)
    }

    fn list_locations(&self) -> RepoResult<Vec<Location>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOCATION_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut locations = Vec::new();
        while let Some(row) = rows.next()? {
            locations.push(parse_location_row(row)?);
        }
        Ok(locations)
    }

    fn facet_options(&self) -> RepoResult<FacetOptions> {
        Ok(FacetOptions {
            rooms: distinct_facet_values(self.conn, Facet::Room)?,
            nouns: distinct_facet_values(self.conn, Facet::Noun)?,
            directions: distinct_facet_values(self.conn, Facet::Direction)?,
        })
    }
}

/// Find-or-create on an open transaction.
///
/// Callers own the transaction so item inserts can share it.
pub(crate) fn resolve_location_in(
    conn: &Connection,
    triple: &LocationTriple,
) -> RepoResult<ResolvedLocation> {
    if let Some(id) = find_location_id(conn, triple)? {
        return Ok(ResolvedLocation { id, created: false });
    }

    let id = insert_location(conn, triple)?;
    Ok(ResolvedLocation { id, created: true })
}

pub(crate) fn location_exists(conn: &Connection, id: LocationId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM locations WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn find_location_id(conn: &Connection, triple: &LocationTriple) -> RepoResult<Option<LocationId>> {
    let id = conn
        .query_row(
            "SELECT id
             FROM locations
             WHERE room = ?1
               AND spot_noun = ?2
               AND spot_direction = ?3
             ORDER BY id ASC
             LIMIT 1;",
            params![triple.room, triple.spot_noun, triple.spot_direction],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn insert_location(conn: &Connection, triple: &LocationTriple) -> RepoResult<LocationId> {
    conn.execute(
        "INSERT INTO locations (room, spot_noun, spot_direction) VALUES (?1, ?2, ?3);",
        params![triple.room, triple.spot_noun, triple.spot_direction],
    )?;
    Ok(conn.last_insert_rowid())
}

fn facet_value_exists(conn: &Connection, facet: Facet, normalized: &str) -> RepoResult<bool> {
    let stored = distinct_facet_values(conn, facet)?;
    Ok(stored.iter().any(|value| facet_match_key(value) == normalized))
}

fn distinct_facet_values(conn: &Connection, facet: Facet) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT {column}
         FROM locations
         WHERE {column} <> ?1
         ORDER BY {column} ASC;",
        column = facet.column()
    ))?;
    let mut rows = stmt.query([UNASSIGNED_FACET])?;
    let mut values = Vec::new();
    while let Some(row) = rows.next()? {
        values.push(row.get(0)?);
    }
    Ok(values)
}

fn parse_location_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get("id")?,
        room: row.get("room")?,
        spot_noun: row.get("spot_noun")?,
        spot_direction: row.get("spot_direction")?,
    })
}
