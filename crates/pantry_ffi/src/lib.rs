//! Flutter-facing bindings for the pantry core.

pub mod api;
