//! Core domain logic for the pantry inventory app.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use form::{FormFlow, FormFlowError, FormState, FormStep};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::location::{
    facet_match_key, humanize_facet, normalize_facet_value, Facet, Location, LocationId,
    LocationTriple, UNASSIGNED_FACET,
};
pub use model::pantry_item::{
    Amount, Category, NewPantryItem, PantryItem, PantryItemDraft, PantryItemId,
};
pub use model::validation::PantryValidationError;
pub use repo::location_repo::{FacetOptions, LocationRepository, ResolvedLocation};
pub use repo::pantry_item_repo::{PantryItemListQuery, PantryItemRepository, SavedPantryItem};
pub use repo::{RepoError, RepoResult, SqlitePantryStore};
pub use service::facet_cache::FacetOptionsCache;
pub use service::location_service::LocationResolver;
pub use service::pantry_service::PantryItemWriter;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
