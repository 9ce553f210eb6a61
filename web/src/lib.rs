//! HTTP surface for the turf booking service.
//!
//! Thin axum shell over the store traits in `turfbook-core`: handlers
//! extract and validate, the backends (Postgres in production, in-memory
//! in tests) do the work, [`AppError`] maps domain errors to status
//! codes. State is a bundle of trait objects, so the whole API can be
//! exercised against the in-memory backend without a database.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use auth::{CurrentActor, StaticTokenVerifier, TokenVerifier};
pub use config::Config;
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
