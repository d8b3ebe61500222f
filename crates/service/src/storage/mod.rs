//! Storage helpers for the service layer
//!
//! File-backed document collection used by the default branch repository.

pub mod json_map_store;
