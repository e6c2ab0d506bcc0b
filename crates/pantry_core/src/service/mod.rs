//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

use crate::repo::RepoError;
use log::{error, warn};

pub mod facet_cache;
pub mod location_service;
pub mod pantry_service;

/// Logs a failed use-case without echoing user input.
pub(crate) fn log_repo_failure(module: &str, event: &str, err: &RepoError) {
    match err {
        RepoError::Db(_) | RepoError::InvalidData(_) | RepoError::UninitializedConnection { .. } => {
            error!("event={event} module={module} status=error error={err}");
        }
        _ => {
            warn!(
                "event={event} module={module} status=rejected field={}",
                err.field().unwrap_or("-")
            );
        }
    }
}
