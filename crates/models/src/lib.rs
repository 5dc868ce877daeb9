//! Persistence layer: SeaORM entities, connection helpers and model-level
//! writes with their own validation.

pub mod errors;
pub mod db;
pub mod user;
