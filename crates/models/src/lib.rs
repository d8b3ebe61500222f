//! Persistence-facing types: the `branch` table entity, field validators
//! shared by the HTTP layer, and the database connection helpers.

pub mod errors;
pub mod db;
pub mod branch;
