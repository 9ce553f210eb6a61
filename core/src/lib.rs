//! Core domain for the Turfbook booking marketplace.
//!
//! This crate holds everything the storage and HTTP layers share:
//!
//! - [`types`]: identifiers, fixed-point [`Money`](types::Money),
//!   entities, and the payment-status state machine;
//! - [`error`]: the [`BookingError`](error::BookingError) taxonomy;
//! - [`slots`]: pure slot-range partitioning for bulk generation;
//! - [`ledger`]: the wallet ledger trait and refund resolution;
//! - [`engine`]: the [`BookingEngine`](engine::BookingEngine) trait, the
//!   one component with multi-step consistency requirements;
//! - [`stores`]: repository traits for venues, players, coupons,
//!   reports and the audit trail;
//! - [`coupons`]: coupon code generation.
//!
//! No I/O happens here. Implementations live in `turfbook-postgres`
//! (production) and `turfbook-testing` (in-memory doubles); both must
//! satisfy the atomicity contracts documented on the traits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coupons;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod slots;
pub mod stores;
pub mod types;

// Re-export the types nearly every consumer needs.
pub use engine::{BookingEngine, BookingFilter, CancelOutcome, ReserveOutcome, SlotAvailability};
pub use error::{BookingError, Result};
pub use ledger::WalletLedger;
pub use slots::SlotRange;
pub use stores::{ActionLog, CouponStore, PlayerDirectory, ReportStore, SlotStore, VenueCatalog};
pub use types::{
    Actor, AdminId, Booking, BookingId, Money, PaymentStatus, Player, PlayerId, Slot, SlotId,
    TransactionKind, Venue, VenueId,
};
