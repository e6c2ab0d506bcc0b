//! First-launch seeding of storage locations.
//!
//! # Invariants
//! - Seeding only runs against an empty `locations` table.
//! - Seeding is all-or-nothing.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection, TransactionBehavior};

/// Default locations as `(room, spot_noun, spot_direction)`.
pub const DEFAULT_LOCATIONS: &[(&str, &str, &str)] = &[
    ("balcony", "shelf", "top"),
    ("kitchen", "fridge", "beside"),
    ("bathroom", "sink", "under"),
    ("store_room", "cabinet", "top"),
    ("laundry", "washer", "above"),
    ("pantry", "shelf", "1st"),
    ("garage", "rack", "left"),
    ("master_bedroom", "bed", "under"),
    ("study_room", "corner", "right"),
];

/// Inserts [`DEFAULT_LOCATIONS`] when no location exists yet.
///
/// Returns the number of inserted rows (`0` when the table already had data).
pub fn seed_default_locations(conn: &mut Connection) -> DbResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO locations (room, spot_noun, spot_direction) VALUES (?1, ?2, ?3);",
        )?;
        for (room, spot_noun, spot_direction) in DEFAULT_LOCATIONS {
            stmt.execute(params![room, spot_noun, spot_direction])?;
        }
    }
    tx.commit()?;

    info!(
        "event=db_seed module=db status=ok inserted={}",
        DEFAULT_LOCATIONS.len()
    );
    Ok(DEFAULT_LOCATIONS.len())
}
