//! Process-wide cache of location facet options.
//!
//! # Invariants
//! - Every location insert bumps the generation and drops the cached value.
//! - A load that raced with an invalidation is returned but not cached.

use crate::repo::location_repo::FacetOptions;
use crate::repo::RepoResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct CachedOptions {
    generation: u64,
    options: FacetOptions,
}

/// Shared cache for the chip lists shown on the location page.
#[derive(Debug, Default)]
pub struct FacetOptionsCache {
    entry: Mutex<Option<CachedOptions>>,
    generation: AtomicU64,
}

impl FacetOptionsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns cached options, or runs `load` and caches its result.
    pub fn get_or_load(
        &self,
        load: impl FnOnce() -> RepoResult<FacetOptions>,
    ) -> RepoResult<FacetOptions> {
        let generation = self.generation();
        if let Some(cached) = self.lock_entry().as_ref() {
            if cached.generation == generation {
                return Ok(cached.options.clone());
            }
        }

        let options = load()?;
        let mut entry = self.lock_entry();
        if self.generation() == generation {
            *entry = Some(CachedOptions {
                generation,
                options: options.clone(),
            });
        }
        Ok(options)
    }

    /// Drops the cached options so the next read reloads from storage.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.lock_entry() = None;
    }

    /// Monotonic counter of invalidations.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_cached(&self) -> bool {
        self.lock_entry().is_some()
    }

    fn lock_entry(&self) -> MutexGuard<'_, Option<CachedOptions>> {
        // Cached data is rebuilt from storage, so a poisoned value is still usable.
        self.entry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
