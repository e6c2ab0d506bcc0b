//! SQLite-backed pantry store shared by location and item repositories.

use crate::db::migrations::latest_version;
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// SQLite implementation of [`LocationRepository`] and [`PantryItemRepository`].
///
/// Holds the connection mutably so write paths can open transactions.
///
/// [`LocationRepository`]: crate::repo::location_repo::LocationRepository
/// [`PantryItemRepository`]: crate::repo::pantry_item_repo::PantryItemRepository
pub struct SqlitePantryStore<'conn> {
    pub(crate) conn: &'conn mut Connection,
}

impl<'conn> SqlitePantryStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}
