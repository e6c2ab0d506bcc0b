//! Pantry item use-case service.
//!
//! # Responsibility
//! - Validate form drafts and persist pantry items.
//! - Run the location-then-item write as one transaction.
//!
//! # Invariants
//! - Drafts are validated before any SQL is issued.
//! - An item never references a location that failed to commit.
//! - A location created by `save` invalidates the facet options cache.

use crate::model::location::{LocationId, LocationTriple};
use crate::model::pantry_item::{PantryItem, PantryItemDraft, PantryItemId};
use crate::repo::pantry_item_repo::{PantryItemListQuery, PantryItemRepository, SavedPantryItem};
use crate::repo::{RepoError, RepoResult};
use crate::service::facet_cache::FacetOptionsCache;
use crate::service::log_repo_failure;
use log::info;
use std::sync::Arc;

/// Write facade for pantry items.
pub struct PantryItemWriter<R: PantryItemRepository> {
    repo: R,
    cache: Arc<FacetOptionsCache>,
}

impl<R: PantryItemRepository> PantryItemWriter<R> {
    pub fn new(repo: R) -> Self {
        Self::with_cache(repo, Arc::new(FacetOptionsCache::new()))
    }

    /// Creates a writer sharing `cache` with a [`LocationResolver`].
    ///
    /// [`LocationResolver`]: crate::service::location_service::LocationResolver
    pub fn with_cache(repo: R, cache: Arc<FacetOptionsCache>) -> Self {
        Self { repo, cache }
    }

    /// Inserts one item against an already resolved location.
    ///
    /// # Errors
    /// - `Validation` naming the first failing field; nothing is written.
    /// - `LocationNotFound` when `location_id` has no row.
    pub fn insert(
        &mut self,
        draft: &PantryItemDraft,
        location_id: LocationId,
    ) -> RepoResult<PantryItemId> {
        let result = draft
            .validate()
            .map_err(RepoError::from)
            .and_then(|item| self.repo.insert_item(&item, location_id));

        match result {
            Ok(item_id) => {
                info!(
                    "event=pantry_item_insert module=pantry status=ok item_id={item_id} location_id={location_id}"
                );
                Ok(item_id)
            }
            Err(err) => {
                log_repo_failure("pantry", "pantry_item_insert", &err);
                Err(err)
            }
        }
    }

    /// Resolves `triple` and inserts the item in a single transaction.
    ///
    /// # Contract
    /// - Both writes commit together or not at all.
    /// - Validation runs before the location lookup.
    pub fn save(
        &mut self,
        draft: &PantryItemDraft,
        triple: &LocationTriple,
    ) -> RepoResult<SavedPantryItem> {
        let result = draft
            .validate()
            .map_err(RepoError::from)
            .and_then(|item| self.repo.insert_item_at(&item, triple));

        match result {
            Ok(saved) => {
                if saved.location_created {
                    self.cache.invalidate();
                }
                info!(
                    "event=pantry_item_save module=pantry status=ok item_id={} location_id={} location_created={}",
                    saved.item_id, saved.location_id, saved.location_created
                );
                Ok(saved)
            }
            Err(err) => {
                log_repo_failure("pantry", "pantry_item_save", &err);
                Err(err)
            }
        }
    }

    pub fn get_item(&self, id: PantryItemId) -> RepoResult<Option<PantryItem>> {
        self.repo.get_item(id)
    }

    pub fn list_items(&self, query: &PantryItemListQuery) -> RepoResult<Vec<PantryItem>> {
        self.repo.list_items(query)
    }
}
