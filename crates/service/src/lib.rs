//! Service layer holding the registration business logic.
//! - Independent of the web framework.
//! - Persistence goes through the `AuthRepository` trait; `models` provides
//!   the SeaORM-backed implementation.
//! - Errors are typed (`AuthError`) so the HTTP layer can map them to statuses.

pub mod auth;
