//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration is the only workflow; the pure input checks live in
//! `validation` and password hashing in `password`.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;
pub mod validation;

pub use service::AuthService;
