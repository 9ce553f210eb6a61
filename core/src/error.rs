//! Error taxonomy for booking operations.
//!
//! Mirrors the failure classes the HTTP layer needs to distinguish:
//! validation problems, missing records, conflicts (lost races, illegal
//! transitions), insufficient funds, and storage failures. Storage
//! failures are the one class that is logged and never swallowed; a
//! multi-entity mutation that cannot complete rolls back entirely.

use crate::types::{BookingId, InvalidStatus, Money, PaymentStatus, SlotId};
use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Errors that can occur during booking, ledger and store operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Missing or malformed input. Reported to the caller, no retry.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"slot"`.
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The slot is already held by an active booking (or the race for it
    /// was lost). The caller may retry with a different slot.
    #[error("slot {0} is not available")]
    SlotUnavailable(SlotId),

    /// A booked slot cannot be deleted.
    #[error("slot {0} is booked and cannot be deleted")]
    SlotBooked(SlotId),

    /// The booking was already cancelled; a second cancellation would
    /// double-refund.
    #[error("booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),

    /// The requested payment-status change is not in the transition table.
    #[error("illegal payment status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: PaymentStatus,
        /// Requested status.
        to: PaymentStatus,
    },

    /// The wallet balance does not cover the slot price.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Slot price.
        required: Money,
        /// Wallet balance at the time of the attempt.
        available: Money,
    },

    /// A ledger movement of zero or negative amount was requested.
    #[error("invalid amount: {0}")]
    InvalidAmount(Money),

    /// Bulk slot generation received an empty or inverted time range.
    #[error("invalid slot range: {0}")]
    InvalidRange(String),

    /// A negative price was supplied.
    #[error("invalid price: {0}")]
    InvalidPrice(Money),

    /// An unknown payment status string was supplied.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),

    /// The atomic multi-entity mutation could not complete. Surfaced as a
    /// failure and logged; the transaction has been rolled back.
    #[error("storage error: {0}")]
    Storage(String),
}

impl BookingError {
    /// Convenience constructor for [`BookingError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the caller could plausibly retry the same request.
    ///
    /// Only conflicts are retryable (with a different slot); validation
    /// and funds errors need a changed request, storage errors need an
    /// operator.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SlotUnavailable(_)
                | Self::SlotBooked(_)
                | Self::AlreadyCancelled(_)
                | Self::InvalidTransition { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::types::SlotId;

    #[test]
    fn display_messages() {
        let err = BookingError::InsufficientFunds {
            required: Money::from_rupees(500),
            available: Money::from_rupees(100),
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: required \u{20b9}500.00, available \u{20b9}100.00"
        );

        let err = BookingError::not_found("slot", "abc");
        assert_eq!(err.to_string(), "slot abc not found");
    }

    #[test]
    fn conflict_classification() {
        assert!(BookingError::SlotUnavailable(SlotId::new()).is_conflict());
        assert!(BookingError::AlreadyCancelled(BookingId::new()).is_conflict());
        assert!(!BookingError::Validation("x".into()).is_conflict());
        assert!(!BookingError::Storage("x".into()).is_conflict());
    }
}
