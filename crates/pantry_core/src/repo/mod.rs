//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for locations and items.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate their input before any SQL mutation.
//! - Multi-statement writes run in one `IMMEDIATE` transaction.
//! - Repository APIs return semantic errors (`DuplicateFacet`,
//!   `LocationNotFound`) in addition to storage errors.

mod error;
pub mod location_repo;
pub mod pantry_item_repo;
mod store;

pub use error::{RepoError, RepoResult};
pub use store::SqlitePantryStore;
