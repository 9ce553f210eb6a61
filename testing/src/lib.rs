//! # Turfbook Testing
//!
//! In-memory test doubles for the Turfbook store and engine traits.
//!
//! [`MemoryBackend`] implements every trait from `turfbook-core` over a
//! single mutex-guarded state, so each engine operation is atomic and two
//! concurrent reservations of the same slot have exactly one winner:
//! the same observable semantics as the Postgres implementation, at
//! memory speed.
//!
//! ## Example
//!
//! ```
//! use turfbook_core::{BookingEngine, Money};
//! use turfbook_testing::MemoryBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> turfbook_core::Result<()> {
//! let backend = MemoryBackend::new();
//! let venue = backend.seed_venue("Green Arena", Money::from_rupees(500))?;
//! let player = backend.seed_player("9876500001", Money::from_rupees(1000))?;
//! let slot = backend.seed_slot(venue.id, 9, Money::from_rupees(500))?;
//!
//! let outcome = backend.reserve(player.id, slot.id).await?;
//! assert_eq!(outcome.balance, Money::from_rupees(500));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;

pub use memory::MemoryBackend;
