//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! persistence adapters and the auth services.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL persistence via SeaORM
//!
//! Without `postgres` the in-memory repositories are the only persistence
//! backend; they also power the API server's endpoint tests.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtTokenService};
pub use database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};
