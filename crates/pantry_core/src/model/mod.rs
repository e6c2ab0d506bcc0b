//! Pantry domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field validation rules shared by repositories and the form.
//!
//! # Invariants
//! - Every pantry item references exactly one location.
//! - Locations are never updated or deleted once created.

pub mod location;
pub mod pantry_item;
pub mod validation;
