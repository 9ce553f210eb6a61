//! The booking engine: slot reservation, cancellation, rescheduling and
//! payment-status transitions.
//!
//! This is the only component with a genuine multi-step consistency
//! requirement. Every operation that touches more than one entity (slot +
//! booking, or slot + booking + wallet) must execute inside a single
//! atomic transaction: a crash or a lost race must never leave a slot
//! marked booked without a booking, nor debit a wallet without creating
//! one. Under concurrent requests for the same slot exactly one
//! reservation wins; the loser observes [`BookingError::SlotUnavailable`].
//!
//! [`BookingError::SlotUnavailable`]: crate::error::BookingError::SlotUnavailable

use crate::error::Result;
use crate::types::{Booking, BookingId, Money, PaymentStatus, PlayerId, SlotId, VenueId};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

/// Result of a successful player-self-service reservation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReserveOutcome {
    /// The created booking (status confirmed).
    pub booking: Booking,
    /// Wallet balance after the debit.
    pub balance: Money,
}

/// Result of a successful cancellation.
#[derive(Clone, Debug, PartialEq)]
pub struct CancelOutcome {
    /// The booking after the cancel transition.
    pub booking: Booking,
    /// Amount credited back to the wallet (possibly zero).
    pub refund: Money,
    /// Wallet balance after the refund.
    pub balance: Money,
}

/// Outcome of an availability pre-check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotAvailability {
    /// Whether the window is free of confirmed bookings.
    pub available: bool,
    /// The conflicting booking, when one exists.
    pub conflict: Option<BookingId>,
}

/// Filters for the admin booking listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Restrict to one venue.
    pub venue: Option<VenueId>,
    /// Restrict to one player.
    pub player: Option<PlayerId>,
    /// Restrict to one payment status.
    pub status: Option<PaymentStatus>,
}

/// Orchestrates slot reservation, cancellation, rescheduling and status
/// transitions over the slot store and the wallet ledger.
///
/// Implementations: the Postgres engine (production, transactional) and
/// the in-memory engine in `turfbook-testing` (mutex-serialized, same
/// winner/loser semantics).
#[async_trait]
pub trait BookingEngine: Send + Sync {
    /// Reserve a slot for a player, paying from their wallet.
    ///
    /// Atomically: debit the slot price, append a debit ledger entry,
    /// create the booking (status confirmed) and set the booked flag.
    ///
    /// # Errors
    ///
    /// `SlotUnavailable` if the slot is already booked (or the race was
    /// lost); `InsufficientFunds` if the wallet balance is below the slot
    /// price; `NotFound` for unknown player or slot; `Storage` if the
    /// transaction fails (fully rolled back).
    async fn reserve(&self, player: PlayerId, slot: SlotId) -> Result<ReserveOutcome>;

    /// Admin-initiated reservation: no upfront wallet debit; records the
    /// advance amount and caller-supplied payment status instead.
    ///
    /// # Errors
    ///
    /// `SlotUnavailable` if the slot is booked; `NotFound` for unknown
    /// player or slot; `Validation` for a negative advance.
    async fn reserve_with_advance(
        &self,
        player: PlayerId,
        slot: SlotId,
        advance: Money,
        status: PaymentStatus,
    ) -> Result<Booking>;

    /// Cancel a booking, free its slot, and refund the wallet.
    ///
    /// Refund resolution: explicit value, else the recorded advance
    /// amount, else zero (see [`resolve_refund`]). The whole sequence is
    /// all-or-nothing; a slot freed without the wallet credited is a
    /// correctness violation.
    ///
    /// [`resolve_refund`]: crate::ledger::resolve_refund
    ///
    /// # Errors
    ///
    /// `AlreadyCancelled` if the booking was cancelled before (prevents
    /// double refunds); `NotFound` for an unknown booking; `Storage` on
    /// transaction failure.
    async fn cancel(
        &self,
        booking: BookingId,
        refund: Option<Money>,
        reason: Option<String>,
    ) -> Result<CancelOutcome>;

    /// Move a booking to a different slot.
    ///
    /// Atomically clears the old slot's booked flag, sets the new one,
    /// and repoints the booking. No money moves even when the prices
    /// differ.
    ///
    /// # Errors
    ///
    /// `SlotUnavailable` if the new slot is booked; `AlreadyCancelled`
    /// for a cancelled booking; `NotFound` for unknown booking or slot.
    async fn reschedule(&self, booking: BookingId, new_slot: SlotId) -> Result<Booking>;

    /// Set the payment status, enforcing the transition table.
    ///
    /// Pure metadata mutation; no side effects on slot or wallet.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if the move is not in the adjacency table;
    /// `NotFound` for an unknown booking.
    async fn update_status(&self, booking: BookingId, status: PaymentStatus) -> Result<Booking>;

    /// Report whether a confirmed booking conflicts with the given window
    /// at a venue. Pure read; used standalone and as a pre-check.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown venue; `Validation` for an inverted
    /// window.
    async fn availability(
        &self,
        venue: VenueId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<SlotAvailability>;

    /// Fetch one booking.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    async fn booking(&self, booking: BookingId) -> Result<Booking>;

    /// All bookings for a player, newest first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown player.
    async fn bookings_for_player(&self, player: PlayerId) -> Result<Vec<Booking>>;

    /// Bookings matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>>;
}
