//! HTTP request handlers.
//!
//! Thin glue: extract, call the store traits, map errors. Handlers never
//! hold business rules; those live in `turfbook-core` and the backends.

pub mod admin;
pub mod bookings;
pub mod coupons;
pub mod health;
pub mod players;
pub mod slots;
pub mod venues;
pub mod wallet;

pub use health::health_check;
