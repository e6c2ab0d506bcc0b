//! Location use-case service.
//!
//! # Responsibility
//! - Resolve form location selections to location ids.
//! - Create single-facet locations from the "add new" flows.
//! - Serve facet chip options through the shared cache.
//!
//! # Invariants
//! - Any location insert invalidates the facet options cache.
//! - Storage failures are logged and returned unchanged; nothing is retried.

use crate::model::location::{Facet, Location, LocationId, LocationTriple};
use crate::repo::location_repo::{FacetOptions, LocationRepository};
use crate::repo::RepoResult;
use crate::service::facet_cache::FacetOptionsCache;
use crate::service::log_repo_failure;
use log::info;
use std::sync::Arc;

/// Find-or-create facade over a location repository.
pub struct LocationResolver<R: LocationRepository> {
    repo: R,
    cache: Arc<FacetOptionsCache>,
}

impl<R: LocationRepository> LocationResolver<R> {
    /// Creates a resolver with a private facet cache.
    pub fn new(repo: R) -> Self {
        Self::with_cache(repo, Arc::new(FacetOptionsCache::new()))
    }

    /// Creates a resolver sharing `cache` with other callers.
    pub fn with_cache(repo: R, cache: Arc<FacetOptionsCache>) -> Self {
        Self { repo, cache }
    }

    /// Returns the id for `triple`, creating the location on first use.
    ///
    /// # Contract
    /// - Repeated calls with the same triple return the same id.
    /// - At most one row is created per distinct triple.
    pub fn resolve(&mut self, triple: &LocationTriple) -> RepoResult<LocationId> {
        match self.repo.resolve_location(triple) {
            Ok(resolved) => {
                if resolved.created {
                    self.cache.invalidate();
                }
                info!(
                    "event=location_resolve module=location status=ok location_id={} created={}",
                    resolved.id, resolved.created
                );
                Ok(resolved.id)
            }
            Err(err) => {
                log_repo_failure("location", "location_resolve", &err);
                Err(err)
            }
        }
    }

    /// Creates a location with only `facet` assigned.
    ///
    /// # Errors
    /// - `Validation` for blank or overlong input.
    /// - `DuplicateFacet` when the normalized value is already in use.
    pub fn create_facet(&mut self, facet: Facet, value: &str) -> RepoResult<Location> {
        match self.repo.create_facet_location(facet, value) {
            Ok(location) => {
                self.cache.invalidate();
                info!(
                    "event=location_create_facet module=location status=ok facet={} location_id={}",
                    facet.as_str(),
                    location.id
                );
                Ok(location)
            }
            Err(err) => {
                log_repo_failure("location", "location_create_facet", &err);
                Err(err)
            }
        }
    }

    /// Distinct assigned values per facet, served from the cache when fresh.
    pub fn facet_options(&self) -> RepoResult<FacetOptions> {
        self.cache.get_or_load(|| self.repo.facet_options())
    }

    pub fn get_location(&self, id: LocationId) -> RepoResult<Option<Location>> {
        self.repo.get_location(id)
    }

    pub fn list_locations(&self) -> RepoResult<Vec<Location>> {
        self.repo.list_locations()
    }

    pub fn cache(&self) -> &Arc<FacetOptionsCache> {
        &self.cache
    }
}
